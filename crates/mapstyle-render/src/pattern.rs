//! Procedural fill patterns drawn onto small square canvases.
//!
//! Every generator paints integer-aligned, non anti-aliased rectangles in a single opaque colour
//! on a transparent tile; anything falling outside the tile is clipped. The tiles are meant to be
//! repeated as a texture fill.

use crate::{Error, Result};
use base64::Engine as _;
use mapstyle_core::{PatternKind, PatternSpec, Rgb};
use std::fmt;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Steps of the blob generator's diagonal; fixed regardless of tile size.
const BLOB_EXTENT: i32 = 10;

/// Spacing between horizontal bands.
const BAND_SPACING: usize = 4;

#[derive(Clone, PartialEq)]
pub struct PatternTile {
    spec: PatternSpec,
    colour: Rgb,
    pixmap: Pixmap,
}

impl fmt::Debug for PatternTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternTile")
            .field("kind", &self.spec.kind())
            .field("size", &self.spec.size())
            .field("colour", &self.colour)
            .field("filled", &self.filled_pixels())
            .finish()
    }
}

impl PatternTile {
    pub fn spec(&self) -> PatternSpec {
        self.spec
    }

    pub fn colour(&self) -> Rgb {
        self.colour
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) RGBA of one pixel, `None` outside the tile.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // `Pixmap::pixel` only checks the flat index, so x past the edge would wrap a row.
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn is_filled(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).is_some_and(|p| p[3] != 0)
    }

    pub fn filled_pixels(&self) -> usize {
        self.pixmap
            .pixels()
            .iter()
            .filter(|p| p.alpha() != 0)
            .count()
    }

    /// Rows of `#` (filled) and `.` (transparent), one line per pixel row.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width() + 1) * self.height()) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(if self.is_filled(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap.encode_png().map_err(|_| Error::PngEncode)
    }

    /// `data:image/png;base64,...`, usable directly as an image source by the host.
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

/// A transparent square canvas with a fixed fill colour.
struct Canvas {
    size: i32,
    pixmap: Pixmap,
    paint: Paint<'static>,
}

impl Canvas {
    fn new(size: u32, colour: Rgb) -> Result<Self> {
        let pixmap = Pixmap::new(size, size).ok_or(Error::PixmapAlloc {
            width: size,
            height: size,
        })?;
        let mut paint = Paint::default();
        paint.set_color_rgba8(colour.r, colour.g, colour.b, 255);
        paint.anti_alias = false;
        Ok(Self {
            size: size as i32,
            pixmap,
            paint,
        })
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let left = x.max(0);
        let top = y.max(0);
        let right = (x + w).min(self.size);
        let bottom = (y + h).min(self.size);
        if left >= right || top >= bottom {
            return;
        }
        let Some(rect) = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32)
        else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &self.paint, Transform::identity(), None);
    }

    fn dot(&mut self, x: i32, y: i32) {
        self.fill_rect(x, y, 1, 1);
    }
}

/// Draws the tile for `spec` in `colour`.
pub fn rasterize(spec: PatternSpec, colour: Rgb) -> Result<PatternTile> {
    let mut canvas = Canvas::new(spec.size(), colour)?;
    let n = canvas.size;

    match spec.kind() {
        PatternKind::Forward => {
            for i in 0..n {
                canvas.dot(n - 1 - i, i);
            }
        }
        PatternKind::Backward => {
            for i in 0..n {
                canvas.dot(i, i);
            }
        }
        PatternKind::Blob => {
            for i in (0..BLOB_EXTENT).step_by(2) {
                canvas.dot(i, i);
                canvas.dot(i + 1, i + 1);
                canvas.dot(i + 3, i + 3);
                canvas.fill_rect(i + 4, i + 4, 4, 4);
            }
        }
        PatternKind::Horizontal => {
            // Every band starts at the top row, so only row 0 ends up painted.
            for i in (0..n).step_by(BAND_SPACING) {
                canvas.fill_rect(i, 0, n, 1);
            }
        }
        PatternKind::Cross => {
            for i in 0..n {
                canvas.dot(i, i);
                canvas.dot(n - i, i);
            }
        }
    }

    tracing::trace!(
        kind = spec.kind().as_str(),
        size = spec.size(),
        colour = %colour,
        "rasterized pattern"
    );
    Ok(PatternTile {
        spec,
        colour,
        pixmap: canvas.pixmap,
    })
}
