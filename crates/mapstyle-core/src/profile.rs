//! Deployment profiles: which pattern each classification gets, how points and labels are
//! styled, and how raw feature attributes resolve to a [`Feature`](crate::Feature).
//!
//! Four profiles are built in, one per map page variant (`geocode`, `legacy`, `debug`,
//! `database`). Custom profiles are JSON objects deep-merged onto a built-in base, see
//! [`StyleProfile::from_json_value`].

use crate::colour::Rgb;
use crate::feature::AttributePolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PROFILE: &str = "geocode";
pub const BUILTIN_PROFILES: &[&str] = &["geocode", "legacy", "debug", "database"];

/// Largest accepted pattern side, in pixels.
pub const MAX_PATTERN_SIZE: u32 = 256;

/// Procedural pattern generators. See `mapstyle_render::pattern` for the pixel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// One-pixel "/" diagonal.
    Forward,
    /// One-pixel "\" diagonal.
    Backward,
    /// Dotted "\" diagonal with a 4x4 square every other step.
    Blob,
    /// Horizontal band along the top row.
    Horizontal,
    /// Both diagonals.
    Cross,
}

impl PatternKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Forward => "forward",
            PatternKind::Backward => "backward",
            PatternKind::Blob => "blob",
            PatternKind::Horizontal => "horizontal",
            PatternKind::Cross => "cross",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPatternSpec")]
pub struct PatternSpec {
    kind: PatternKind,
    size: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatternSpec {
    kind: PatternKind,
    size: u32,
}

impl TryFrom<RawPatternSpec> for PatternSpec {
    type Error = Error;

    fn try_from(raw: RawPatternSpec) -> Result<Self> {
        PatternSpec::new(raw.kind, raw.size)
    }
}

impl PatternSpec {
    pub fn new(kind: PatternKind, size: u32) -> Result<Self> {
        if size == 0 || size > MAX_PATTERN_SIZE {
            return Err(Error::InvalidProfile {
                message: format!(
                    "pattern size must be between 1 and {MAX_PATTERN_SIZE}, got {size}"
                ),
            });
        }
        Ok(Self { kind, size })
    }

    pub fn kind(self) -> PatternKind {
        self.kind
    }

    /// Side of the square tile in pixels.
    pub fn size(self) -> u32 {
        self.size
    }

    const fn builtin(kind: PatternKind, size: u32) -> Self {
        Self { kind, size }
    }
}

/// Maps a set of classification tags to one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRule {
    pub tags: Vec<String>,
    pub pattern: PatternSpec,
}

impl PatternRule {
    fn new(tags: &[&str], pattern: PatternSpec) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            pattern,
        }
    }

    pub fn matches(&self, classification: &str) -> bool {
        self.tags.iter().any(|t| t == classification)
    }
}

/// Outline colour for point labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LabelStroke {
    Fixed { colour: Rgb },
    /// The feature's opposite colour.
    Inverse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointStyle {
    /// When false, point features get the same pattern fill as areas.
    pub styled: bool,
    pub marker_radius: f32,
    pub marker_stroke_width: f32,
    pub label_stroke: LabelStroke,
    pub label_stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelPolicy {
    pub width: usize,
    pub separator: String,
    pub font: String,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            width: 16,
            separator: "\n".to_string(),
            font: r#"13px "Open Sans", "Arial Unicode MS""#.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleProfile {
    pub name: String,
    pub attributes: AttributePolicy,
    /// Checked in order; the first rule listing the classification wins.
    pub rules: Vec<PatternRule>,
    pub default_pattern: PatternSpec,
    pub points: PointStyle,
    pub label: LabelPolicy,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::geocode()
    }
}

impl StyleProfile {
    /// The geocoder test page: political, botanical, administrative and marine layers.
    pub fn geocode() -> Self {
        use PatternKind::*;
        Self {
            name: "geocode".to_string(),
            attributes: AttributePolicy {
                code_keys: vec!["isocountrycode2digit".to_string(), "id".to_string()],
                id_only_prefixes: vec!["GADM".to_string()],
                ..AttributePolicy::default()
            },
            rules: vec![
                PatternRule::new(&["Political"], PatternSpec::builtin(Blob, 14)),
                PatternRule::new(&["WGSRPD"], PatternSpec::builtin(Backward, 8)),
                PatternRule::new(&["GADM3", "IHO"], PatternSpec::builtin(Horizontal, 8)),
            ],
            default_pattern: PatternSpec::builtin(Forward, 8),
            points: PointStyle {
                styled: true,
                marker_radius: 2.5,
                marker_stroke_width: 1.0,
                label_stroke: LabelStroke::Fixed {
                    colour: Rgb::new(0xd0, 0xd0, 0xd0),
                },
                label_stroke_width: 3.0,
            },
            label: LabelPolicy::default(),
        }
    }

    /// The older web application page (political and EEZ layers only).
    pub fn legacy() -> Self {
        use PatternKind::*;
        Self {
            name: "legacy".to_string(),
            attributes: AttributePolicy::default(),
            rules: vec![
                PatternRule::new(&["Political"], PatternSpec::builtin(Blob, 14)),
                PatternRule::new(&["EEZ"], PatternSpec::builtin(Horizontal, 8)),
            ],
            default_pattern: PatternSpec::builtin(Forward, 8),
            points: PointStyle {
                styled: true,
                marker_radius: 8.0,
                marker_stroke_width: 1.0,
                label_stroke: LabelStroke::Inverse,
                label_stroke_width: 3.0,
            },
            label: LabelPolicy::default(),
        }
    }

    /// The standalone debug page over Natural Earth style attributes.
    pub fn debug() -> Self {
        use PatternKind::*;
        Self {
            name: "debug".to_string(),
            attributes: AttributePolicy {
                code_keys: vec!["iso_a2".to_string()],
                ..AttributePolicy::default()
            },
            rules: vec![PatternRule::new(&["eez"], PatternSpec::builtin(Blob, 10))],
            default_pattern: PatternSpec::builtin(Forward, 4),
            points: PointStyle {
                styled: false,
                ..Self::legacy().points
            },
            label: LabelPolicy::default(),
        }
    }

    /// The database inspection page: one cross-hatch for everything.
    pub fn database() -> Self {
        Self {
            name: "database".to_string(),
            rules: Vec::new(),
            default_pattern: PatternSpec::builtin(PatternKind::Cross, 5),
            ..Self::debug()
        }
    }

    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "geocode" => Ok(Self::geocode()),
            "legacy" => Ok(Self::legacy()),
            "debug" => Ok(Self::debug()),
            "database" => Ok(Self::database()),
            other => Err(Error::UnknownProfile {
                name: other.to_string(),
            }),
        }
    }

    /// Pattern for a classification tag. Unrecognized tags get the default pattern.
    pub fn pattern_for(&self, classification: &str) -> PatternSpec {
        match self.rules.iter().find(|r| r.matches(classification)) {
            Some(rule) => rule.pattern,
            None => {
                tracing::trace!(
                    profile = %self.name,
                    classification,
                    "no pattern rule matched; using default pattern"
                );
                self.default_pattern
            }
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Builds a profile from a JSON object.
    ///
    /// The optional `"base"` key names a built-in profile (default `geocode`). All other keys are
    /// deep-merged onto that profile: objects merge key by key, any other value (arrays included)
    /// replaces the base value.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let Some(overlay) = value.as_object() else {
            return Err(Error::InvalidProfile {
                message: "profile must be a JSON object".to_string(),
            });
        };

        let base_name = match overlay.get("base") {
            None => DEFAULT_PROFILE,
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(Error::InvalidProfile {
                    message: "`base` must be a string".to_string(),
                });
            }
        };
        let base = Self::builtin(base_name)?;

        let mut overlay: Map<String, Value> = overlay.clone();
        overlay.remove("base");

        let mut merged = serde_json::to_value(&base)?;
        deep_merge_value(&mut merged, &Value::Object(overlay));

        let profile: Self = serde_json::from_value(merged)?;
        profile.validate()?;
        tracing::debug!(profile = %profile.name, base = base_name, "loaded style profile");
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidProfile { message });

        if self.name.trim().is_empty() {
            return invalid("profile name must not be empty".to_string());
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.tags.is_empty() {
                return invalid(format!("rule {i} has no tags"));
            }
        }
        let points = &self.points;
        for (field, v) in [
            ("marker_radius", points.marker_radius),
            ("marker_stroke_width", points.marker_stroke_width),
            ("label_stroke_width", points.label_stroke_width),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return invalid(format!("points.{field} must be a non-negative number"));
            }
        }
        if self.attributes.code_keys.is_empty() {
            return invalid("attributes.code_keys must not be empty".to_string());
        }
        Ok(())
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
