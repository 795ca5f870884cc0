#![forbid(unsafe_code)]

//! Rasterizes classification patterns and assembles per-feature style layers.
//!
//! Pattern tiles are drawn on a transient `tiny-skia` pixmap, one call at a time; the optional
//! [`cache::PatternCache`] only memoizes results, it never changes them.

pub mod cache;
pub mod pattern;
pub mod style;

pub use cache::PatternCache;
pub use pattern::{PatternTile, rasterize};
pub use style::{PatternFill, StyleDeriver, StyleLayer, StyleOptions};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] mapstyle_core::Error),
    #[error("failed to allocate {width}x{height} pixmap for pattern rasterization")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, Error>;
