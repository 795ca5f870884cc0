#![cfg(feature = "render")]

use mapstyle::render::{
    HeadlessError, HeadlessStyler, StyleLayer, StyleOptions, builtin_deriver, derive_styles,
    deriver_from_json,
};
use mapstyle::{
    Error, Feature, FeatureAttributes, GeometryKind, PatternKind, PatternSpec, StyleProfile,
    country_colour,
};

#[test]
fn one_shot_derivation_matches_styler() {
    let feature = Feature::new("Political", "NL", GeometryKind::Area);
    let one_shot = derive_styles("geocode", &feature, StyleOptions::default()).unwrap();
    let styler = HeadlessStyler::new();
    assert_eq!(one_shot, styler.style(&feature).unwrap());
}

#[test]
fn unknown_profile_is_a_profile_error() {
    let feature = Feature::new("Political", "NL", GeometryKind::Area);
    let err = derive_styles("nope", &feature, StyleOptions::default()).unwrap_err();
    assert!(matches!(err, HeadlessError::Profile(_)), "{err:?}");
    assert!(err.to_string().contains("nope"));
}

#[test]
fn styler_resolves_attributes_with_its_profile() {
    let styler = HeadlessStyler::new()
        .with_profile(StyleProfile::legacy())
        .with_labels(true);
    let attributes: FeatureAttributes = serde_json::from_value(serde_json::json!({
        "type": "Political",
        "id": "SE",
        "title": "Sweden"
    }))
    .unwrap();

    let layers = styler
        .style_attributes(&attributes, GeometryKind::Point)
        .unwrap();
    assert_eq!(layers.len(), 2);
    let StyleLayer::Marker { fill, radius, .. } = &layers[1] else {
        panic!("expected marker layer, got {layers:?}");
    };
    assert_eq!(*fill, country_colour("SE"));
    assert_eq!(*radius, 8.0);
}

#[test]
fn builtin_deriver_caches_with_named_profile() {
    let deriver = builtin_deriver("legacy").unwrap();
    assert_eq!(deriver.profile(), &StyleProfile::legacy());

    let cache = deriver.cache().expect("builtin deriver caches tiles");
    assert!(cache.is_empty());
    let feature = Feature::new("EEZ", "NL", GeometryKind::Area);
    deriver.derive(&feature, StyleOptions::default()).unwrap();
    deriver.derive(&feature, StyleOptions::default()).unwrap();
    assert_eq!(cache.len(), 1);

    assert!(matches!(
        builtin_deriver("nope"),
        Err(HeadlessError::Profile(Error::UnknownProfile { .. }))
    ));
}

#[test]
fn json_deriver_applies_overlay() {
    let deriver = deriver_from_json(
        r#"{ "base": "database", "name": "coarse", "default_pattern": { "kind": "blob", "size": 10 } }"#,
    )
    .unwrap();
    assert_eq!(deriver.profile().name, "coarse");
    assert_eq!(
        deriver.profile().attributes,
        StyleProfile::database().attributes
    );
    assert!(deriver.cache().is_some());

    let tile = deriver.pattern("anything", "FR").unwrap();
    assert_eq!(tile.spec(), PatternSpec::new(PatternKind::Blob, 10).unwrap());
    assert_eq!(tile.width(), 10);
}

#[test]
fn malformed_json_is_a_profile_json_error() {
    let err = deriver_from_json("{ \"name\": ").unwrap_err();
    assert!(
        matches!(err, HeadlessError::Profile(Error::Json(_))),
        "{err:?}"
    );
}
