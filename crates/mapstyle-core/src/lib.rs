#![forbid(unsafe_code)]

//! Deterministic style derivation for map features (headless).
//!
//! Given a feature's classification tag and identifying code, this crate derives:
//! - a colour and an "opposite" colour from a djb2 hash of the code
//! - the pattern spec selected by the active [`StyleProfile`]
//! - word-wrapped label text
//!
//! Everything here is a pure function of its inputs. Rasterizing the selected pattern lives in
//! `mapstyle-render`.

pub mod colour;
pub mod error;
pub mod feature;
pub mod hash;
pub mod palette;
pub mod profile;
pub mod wrap;

pub use colour::{ColourPair, Rgb, colour_pair, country_colour, opposite_country_colour};
pub use error::{Error, Result};
pub use feature::{AttributePolicy, Feature, FeatureAttributes, GeometryKind};
pub use hash::djb2;
pub use profile::{
    LabelPolicy, LabelStroke, PatternKind, PatternRule, PatternSpec, PointStyle, StyleProfile,
};
pub use wrap::{string_divider, wrap_label};

#[cfg(test)]
mod tests;
