//! Overpass QL query construction

use crate::domain::BoundingBox;

/// Feature selectors, one clause each: `(element type, tag filter)`.
pub const FEATURE_CLAUSES: &[(&str, &str)] = &[
    // buildings
    ("way", r#"["building"]"#),
    ("relation", r#"["building"]"#),
    // roads
    ("way", r#"["highway"]"#),
    // water
    ("way", r#"["natural"="water"]"#),
    ("way", r#"["waterway"]"#),
    // points of interest
    ("node", r#"["amenity"]"#),
    ("node", r#"["shop"]"#),
    ("node", r#"["tourism"]"#),
    // forests
    ("way", r#"["natural"="wood"]"#),
    ("way", r#"["landuse"="forest"]"#),
];

/// Build the Overpass QL query for all feature classes within `bbox`.
///
/// The union is emitted with `out body`, followed by a recurse-down (`>`) and
/// `out skel qt` so the nodes referenced by returned ways are included.
pub fn build_overpass_query(bbox: &BoundingBox, server_timeout_secs: u32) -> String {
    let bbox = bbox.to_string();

    let mut query = format!("[out:json][timeout:{server_timeout_secs}];\n(\n");
    for (kind, filter) in FEATURE_CLAUSES {
        query.push_str(&format!("  {kind}{filter}({bbox});\n"));
    }
    query.push_str(");\nout body;\n>;\nout skel qt;\n");
    query
}
