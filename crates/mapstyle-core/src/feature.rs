//! The explicit input to style derivation, and its resolution from raw attribute bags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    Area,
}

impl GeometryKind {
    /// Only the exact `"Point"` geometry type is styled as a point; everything else (lines,
    /// polygons, multi-geometries) is treated as an area.
    pub fn from_geometry_type(geometry_type: &str) -> Self {
        if geometry_type == "Point" {
            GeometryKind::Point
        } else {
            GeometryKind::Area
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    pub classification: String,
    pub code: String,
    pub geometry: GeometryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Feature {
    pub fn new(
        classification: impl Into<String>,
        code: impl Into<String>,
        geometry: GeometryKind,
    ) -> Self {
        Self {
            classification: classification.into(),
            code: code.into(),
            geometry,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Which attribute keys hold the classification, title and identifier code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributePolicy {
    pub classification_key: String,
    pub title_key: String,
    pub id_key: String,
    /// Tried in order; the first present, non-empty value is the code.
    pub code_keys: Vec<String>,
    /// Classifications with one of these prefixes always take their code from `id_key`.
    pub id_only_prefixes: Vec<String>,
}

impl Default for AttributePolicy {
    fn default() -> Self {
        Self {
            classification_key: "type".to_string(),
            title_key: "title".to_string(),
            id_key: "id".to_string(),
            code_keys: vec!["id".to_string()],
            id_only_prefixes: Vec::new(),
        }
    }
}

/// Vector tiles often carry integer ids as doubles; whole values print without a fraction.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{f:.0}")
            }
        }
        _ => n.to_string(),
    }
}

/// Attribute bag of one decoded feature, as handed over by the host map library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureAttributes(Map<String, Value>);

impl FeatureAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Text form of an attribute. Strings are returned as-is, numbers and booleans the way a
    /// browser stringifies them (`12.0` reads `"12"`); null, arrays and objects count as absent.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_text(n)),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_text(key).filter(|s| !s.is_empty())
    }

    /// Resolves the attribute bag into a [`Feature`]. Missing attributes become empty strings,
    /// which still hash to a stable colour and fall through to the default pattern.
    pub fn resolve(&self, policy: &AttributePolicy, geometry: GeometryKind) -> Feature {
        let classification = self
            .get_text(&policy.classification_key)
            .unwrap_or_default();

        let id_only = policy
            .id_only_prefixes
            .iter()
            .any(|p| classification.starts_with(p.as_str()));
        let code = if id_only {
            self.get_text(&policy.id_key)
        } else {
            policy.code_keys.iter().find_map(|k| self.get_non_empty(k))
        };
        let code = code.unwrap_or_else(|| {
            tracing::debug!(
                classification = %classification,
                "feature has no identifier attribute; using an empty code"
            );
            String::new()
        });

        Feature {
            classification,
            code,
            geometry,
            title: self.get_text(&policy.title_key),
        }
    }
}

impl From<Map<String, Value>> for FeatureAttributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
