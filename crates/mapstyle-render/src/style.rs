//! Per-feature style layers.
//!
//! [`StyleDeriver::derive`] returns a freshly built list of layers for every call. Nothing is
//! carried over between features apart from memoized pattern tiles, which are immutable.

use crate::cache::PatternCache;
use crate::pattern::{PatternTile, rasterize};
use crate::Result;
use mapstyle_core::{
    ColourPair, Feature, FeatureAttributes, GeometryKind, LabelStroke, Rgb, StyleProfile,
    colour_pair, wrap_label,
};
use serde::ser::{Error as _, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Draw title labels next to point markers.
    pub labels: bool,
}

impl StyleOptions {
    pub fn with_labels() -> Self {
        Self { labels: true }
    }
}

/// A rasterized pattern used as a repeating fill.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternFill(pub Arc<PatternTile>);

impl PatternFill {
    pub fn tile(&self) -> &PatternTile {
        &self.0
    }
}

impl Serialize for PatternFill {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let tile = self.tile();
        let data_url = tile.to_data_url().map_err(S::Error::custom)?;
        let mut s = serializer.serialize_struct("PatternFill", 4)?;
        s.serialize_field("kind", tile.spec().kind().as_str())?;
        s.serialize_field("width", &tile.width())?;
        s.serialize_field("height", &tile.height())?;
        s.serialize_field("data_url", &data_url)?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum StyleLayer {
    /// Pattern fill with a solid outline.
    Area { fill: PatternFill, stroke: Rgb },
    /// Text drawn before the marker so the marker sits on top.
    Label {
        text: String,
        font: String,
        fill: Rgb,
        stroke: Rgb,
        stroke_width: f32,
    },
    Marker {
        radius: f32,
        fill: Rgb,
        stroke: Rgb,
        stroke_width: f32,
    },
}

#[derive(Debug)]
pub struct StyleDeriver {
    profile: StyleProfile,
    cache: Option<PatternCache>,
}

impl Default for StyleDeriver {
    fn default() -> Self {
        Self::new(StyleProfile::default())
    }
}

impl StyleDeriver {
    pub fn new(profile: StyleProfile) -> Self {
        Self {
            profile,
            cache: None,
        }
    }

    /// Memoize rasterized tiles across calls.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(PatternCache::new());
        self
    }

    pub fn profile(&self) -> &StyleProfile {
        &self.profile
    }

    pub fn cache(&self) -> Option<&PatternCache> {
        self.cache.as_ref()
    }

    /// The tile used to fill areas of `classification` drawn in the colour of `code`.
    pub fn pattern(&self, classification: &str, code: &str) -> Result<Arc<PatternTile>> {
        let colours = colour_pair(code);
        self.tile_for(classification, colours.colour)
    }

    fn tile_for(&self, classification: &str, colour: Rgb) -> Result<Arc<PatternTile>> {
        let spec = self.profile.pattern_for(classification);
        match &self.cache {
            Some(cache) => cache.get_or_rasterize(spec, colour),
            None => Ok(Arc::new(rasterize(spec, colour)?)),
        }
    }

    pub fn derive(&self, feature: &Feature, options: StyleOptions) -> Result<Vec<StyleLayer>> {
        let colours = colour_pair(&feature.code);
        let points = &self.profile.points;

        if feature.geometry == GeometryKind::Area || !points.styled {
            let tile = self.tile_for(&feature.classification, colours.colour)?;
            return Ok(vec![StyleLayer::Area {
                fill: PatternFill(tile),
                stroke: colours.colour,
            }]);
        }

        let mut layers = Vec::with_capacity(2);
        if options.labels {
            if let Some(label) = self.label_layer(feature, colours) {
                layers.push(label);
            }
        }
        layers.push(StyleLayer::Marker {
            radius: points.marker_radius,
            fill: colours.colour,
            stroke: colours.opposite,
            stroke_width: points.marker_stroke_width,
        });
        Ok(layers)
    }

    /// Resolves a raw attribute bag with the profile's attribute policy, then derives.
    pub fn derive_attributes(
        &self,
        attributes: &FeatureAttributes,
        geometry: GeometryKind,
        options: StyleOptions,
    ) -> Result<Vec<StyleLayer>> {
        let feature = attributes.resolve(&self.profile.attributes, geometry);
        self.derive(&feature, options)
    }

    fn label_layer(&self, feature: &Feature, colours: ColourPair) -> Option<StyleLayer> {
        let label = &self.profile.label;
        let text = wrap_label(feature.title.as_deref(), label.width, &label.separator)?;
        let stroke = match self.profile.points.label_stroke {
            LabelStroke::Fixed { colour } => colour,
            LabelStroke::Inverse => colours.opposite,
        };
        Some(StyleLayer::Label {
            text,
            font: label.font.clone(),
            fill: colours.colour,
            stroke,
            stroke_width: self.profile.points.label_stroke_width,
        })
    }
}
