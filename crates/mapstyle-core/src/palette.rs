//! Evenly distributed colour palettes for lookup bitmaps and legends.
//!
//! The colour wheel is cut into `hues` sectors and each sector contributes a 5x5 grid of
//! saturation and value steps, so neighbouring identifiers can be given visibly different colours
//! without any hashing.

use crate::colour::Rgb;

pub const DEFAULT_HUES: usize = 36;

const STEPS: [f64; 5] = [2.0 / 6.0, 3.0 / 6.0, 4.0 / 6.0, 5.0 / 6.0, 1.0];

/// HSV to 8-bit RGB. `h` in degrees, `s` and `v` in `[0, 1]`.
///
/// Channels are scaled by 255 and truncated, not rounded.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    if s == 0.0 {
        return to_rgb8(v, v, v);
    }

    let h = h.rem_euclid(360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as i64 {
        0 => to_rgb8(v, t, p),
        1 => to_rgb8(q, v, p),
        2 => to_rgb8(p, v, t),
        3 => to_rgb8(p, q, v),
        4 => to_rgb8(t, p, v),
        _ => to_rgb8(v, p, q),
    }
}

fn to_rgb8(r: f64, g: f64, b: f64) -> Rgb {
    let channel = |c: f64| (255.0 * c.clamp(0.0, 1.0)) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// `hues * 25` colours: hue sectors in order, then saturation, then value.
pub fn sector_palette(hues: usize) -> Vec<Rgb> {
    let hues = hues.max(1);
    let mut out = Vec::with_capacity(hues * STEPS.len() * STEPS.len());
    for segment in 0..hues {
        let h = (segment as f64 / hues as f64) * 360.0;
        for s in STEPS {
            for v in STEPS {
                out.push(hsv_to_rgb(h, s, v));
            }
        }
    }
    out
}

/// Assigns palette colours to `ids` in input order.
///
/// Consecutive identifiers step through the palette with a stride near 0.618 of its length that
/// is coprime to it, so every entry is used once before any repeats and adjacent ids land in
/// distant hue sectors. More ids than palette entries wrap around.
pub fn assign_colours<S: AsRef<str>>(ids: &[S], hues: usize) -> Vec<(String, Rgb)> {
    let palette = sector_palette(hues);
    let n = palette.len();
    if ids.len() > n {
        tracing::warn!(
            ids = ids.len(),
            colours = n,
            "more identifiers than palette colours; colours will repeat"
        );
    }

    let stride = spread_stride(n);
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref().to_string(), palette[(i * stride) % n]))
        .collect()
}

fn spread_stride(n: usize) -> usize {
    if n <= 2 {
        return 1;
    }
    let mut k = ((n as f64) * 0.618).ceil() as usize;
    while gcd(k, n) != 1 {
        k += 1;
    }
    k
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
