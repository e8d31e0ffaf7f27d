use std::fs;
use std::path::Path;

use ledframe_core::{PanelGeometry, SerpentineMapper};
use serde_json::Value;

fn load_expected_layout(dir: &str) -> Value {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let expected_path = root.join(dir).join("expected_layout.json");

    let expected_json = fs::read_to_string(&expected_path).expect("read expected_layout.json");
    serde_json::from_str(&expected_json).expect("parse expected layout")
}

#[test]
fn golden_layout_32x24() {
    let expected = load_expected_layout("tests/golden/layout_32x24");
    let actual = SerpentineMapper::new(PanelGeometry::DEFAULT).layout();
    let actual_value = serde_json::to_value(actual).expect("serialize layout");

    assert_eq!(actual_value, expected, "golden mismatch in layout_32x24");
}

#[test]
fn golden_layout_anchors() {
    let expected = load_expected_layout("tests/golden/layout_32x24");
    let chain = expected["chain"].as_array().expect("chain array");
    assert_eq!(chain.len(), 768);
    assert_eq!(chain[248], serde_json::json!([0, 0]));
    assert_eq!(chain[512], serde_json::json!([31, 23]));
}
