use crate::*;
use serde_json::json;

fn attrs(value: serde_json::Value) -> FeatureAttributes {
    serde_json::from_value(value).unwrap()
}

#[test]
fn prefers_iso_code_over_id() {
    let policy = StyleProfile::geocode().attributes;
    let f = attrs(json!({ "type": "Political", "isocountrycode2digit": "NL", "id": "NLD.1" }))
        .resolve(&policy, GeometryKind::Area);
    assert_eq!(f.classification, "Political");
    assert_eq!(f.code, "NL");
    assert_eq!(f.title, None);
}

#[test]
fn falls_back_to_id_when_iso_code_missing_or_empty() {
    let policy = StyleProfile::geocode().attributes;
    let f = attrs(json!({ "type": "WGSRPD", "id": "12" })).resolve(&policy, GeometryKind::Area);
    assert_eq!(f.code, "12");

    let f = attrs(json!({ "type": "WGSRPD", "isocountrycode2digit": "", "id": 7 }))
        .resolve(&policy, GeometryKind::Area);
    assert_eq!(f.code, "7");
}

#[test]
fn gadm_features_always_use_id() {
    let policy = StyleProfile::geocode().attributes;
    let f = attrs(json!({ "type": "GADM2", "isocountrycode2digit": "DK", "id": "DNK.1.3_1" }))
        .resolve(&policy, GeometryKind::Area);
    assert_eq!(f.code, "DNK.1.3_1");
}

#[test]
fn missing_attributes_resolve_to_empty_strings() {
    let policy = AttributePolicy::default();
    let f = FeatureAttributes::new().resolve(&policy, GeometryKind::Point);
    assert_eq!(f.classification, "");
    assert_eq!(f.code, "");
    assert_eq!(f.geometry, GeometryKind::Point);
}

#[test]
fn title_is_carried_through() {
    let mut a = FeatureAttributes::new();
    a.insert("type", "Centroids")
        .insert("id", "DK")
        .insert("title", "Kingdom of Denmark");
    let f = a.resolve(&AttributePolicy::default(), GeometryKind::Point);
    assert_eq!(f.title.as_deref(), Some("Kingdom of Denmark"));
}

#[test]
fn debug_profile_reads_natural_earth_codes() {
    let policy = StyleProfile::debug().attributes;
    let f = attrs(json!({ "type": "eez", "iso_a2": "FR", "id": 99 }))
        .resolve(&policy, GeometryKind::Area);
    assert_eq!(f.code, "FR");
}

#[test]
fn only_exact_point_geometry_is_a_point() {
    assert_eq!(GeometryKind::from_geometry_type("Point"), GeometryKind::Point);
    assert_eq!(GeometryKind::from_geometry_type("MultiPoint"), GeometryKind::Area);
    assert_eq!(GeometryKind::from_geometry_type("Polygon"), GeometryKind::Area);
}

#[test]
fn whole_float_ids_read_like_integers() {
    let policy = AttributePolicy::default();
    let code = |id: serde_json::Value| {
        attrs(json!({ "id": id }))
            .resolve(&policy, GeometryKind::Area)
            .code
    };
    assert_eq!(code(json!(12.0)), "12");
    assert_eq!(code(json!(12)), "12");
    assert_eq!(code(json!(-3.0)), "-3");
    assert_eq!(code(json!(-0.0)), "0");
    assert_eq!(code(json!(12.5)), "12.5");
    assert_eq!(code(json!(1e20)), "100000000000000000000");
    assert_eq!(country_colour(&code(json!(12.0))), country_colour("12"));
}
