#![forbid(unsafe_code)]

//! `mapstyle` derives deterministic styles for map features.
//!
//! A feature's identifying code picks its colour, its classification tag picks a procedural fill
//! pattern, and its title becomes a wrapped label. The same inputs always give the same output,
//! across runs and machines.
//!
//! # Features
//!
//! - `render`: enable pattern rasterization and style layers (`mapstyle::render`)

pub use mapstyle_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use mapstyle_render::Error as RenderError;
    pub use mapstyle_render::{
        PatternCache, PatternFill, PatternTile, StyleDeriver, StyleLayer, StyleOptions, rasterize,
    };

    use mapstyle_core::{Feature, FeatureAttributes, GeometryKind, StyleProfile};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Profile(#[from] mapstyle_core::Error),
        #[error(transparent)]
        Render(#[from] mapstyle_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Looks up a built-in profile by name and wraps it in a caching deriver.
    pub fn builtin_deriver(profile: &str) -> Result<StyleDeriver> {
        Ok(StyleDeriver::new(StyleProfile::builtin(profile)?).with_cache())
    }

    /// Builds a caching deriver from a JSON profile document.
    pub fn deriver_from_json(text: &str) -> Result<StyleDeriver> {
        Ok(StyleDeriver::new(StyleProfile::from_json_str(text)?).with_cache())
    }

    /// One-shot derivation with a built-in profile.
    pub fn derive_styles(
        profile: &str,
        feature: &Feature,
        options: StyleOptions,
    ) -> Result<Vec<StyleLayer>> {
        let deriver = StyleDeriver::new(StyleProfile::builtin(profile)?);
        Ok(deriver.derive(feature, options)?)
    }

    /// Convenience wrapper bundling a deriver with fixed options for repeated calls.
    ///
    /// Intended for hosts that style many features of one layer at a time.
    #[derive(Debug)]
    pub struct HeadlessStyler {
        pub deriver: StyleDeriver,
        pub options: StyleOptions,
    }

    impl Default for HeadlessStyler {
        fn default() -> Self {
            Self {
                deriver: StyleDeriver::default().with_cache(),
                options: StyleOptions::default(),
            }
        }
    }

    impl HeadlessStyler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_profile(mut self, profile: StyleProfile) -> Self {
            self.deriver = StyleDeriver::new(profile).with_cache();
            self
        }

        pub fn with_labels(mut self, labels: bool) -> Self {
            self.options.labels = labels;
            self
        }

        pub fn style(&self, feature: &Feature) -> Result<Vec<StyleLayer>> {
            Ok(self.deriver.derive(feature, self.options)?)
        }

        pub fn style_attributes(
            &self,
            attributes: &FeatureAttributes,
            geometry: GeometryKind,
        ) -> Result<Vec<StyleLayer>> {
            Ok(self
                .deriver
                .derive_attributes(attributes, geometry, self.options)?)
        }
    }
}
