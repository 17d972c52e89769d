//! Directory loading across RON, TOML and JSON data files.

use forge_data::{DataLoadError, load_catalog};
use std::fs;
use std::path::{Path, PathBuf};

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "forge_data_catalog_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

// ===========================================================================
// Mixed formats
// ===========================================================================

#[test]
fn loads_mixed_format_directory() {
    let dir = make_test_dir("mixed");
    fs::write(
        dir.join("items.ron"),
        r#"[
            (slug: "Iron Ore", name: "Iron Ore", raw_resource: true),
            (slug: "iron-ingot", name: "Iron Ingot"),
        ]"#,
    )
    .unwrap();
    fs::write(
        dir.join("buildings.toml"),
        "[[buildings]]\nslug = \"smelter\"\nname = \"Smelter\"\n",
    )
    .unwrap();
    fs::write(
        dir.join("recipes.json"),
        r#"[{
            "slug": "smelt-iron-ore",
            "name": "Smelt Iron Ore",
            "cycle_seconds": 1.0,
            "ingredients": [["iron-ore", 1.0]],
            "products": [{"item": "iron-ingot", "amount": 1.0}],
            "produced_in": ["smelter"]
        }]"#,
    )
    .unwrap();
    fs::write(
        dir.join("plans.toml"),
        r#"
[[plans]]
slug = "ingots"
name = "Ingots"
targets = [{ item = "iron-ingot", amount = 30.0 }]
available_inputs = [["iron-ore", 30.0]]
"#,
    )
    .unwrap();

    let catalog = load_catalog(&dir).unwrap();
    assert_eq!(catalog.items.len(), 2);
    assert_eq!(catalog.buildings.len(), 1);
    assert_eq!(catalog.recipes.len(), 1);
    assert_eq!(catalog.plans.len(), 1);

    // The item slug was normalized on the way in.
    let ore = catalog.item_by_slug("iron-ore").unwrap();
    let recipe = catalog.recipe_by_slug("smelt-iron-ore").unwrap();
    assert_eq!(recipe.ingredients()[0].item_id(), ore.id());
    assert_eq!(
        catalog.plan_by_slug("ingots").unwrap().available_inputs()[0].item_id(),
        ore.id()
    );

    cleanup(&dir);
}

#[test]
fn recipes_and_plans_are_optional() {
    let dir = make_test_dir("optional");
    fs::write(dir.join("items.json"), r#"[{"slug": "screw", "name": "Screw"}]"#).unwrap();
    fs::write(dir.join("buildings.json"), "[]").unwrap();

    let catalog = load_catalog(&dir).unwrap();
    assert_eq!(catalog.items.len(), 1);
    assert!(catalog.recipes.is_empty());
    assert!(catalog.plans.is_empty());

    cleanup(&dir);
}

// ===========================================================================
// Error cases
// ===========================================================================

#[test]
fn missing_buildings_file_fails() {
    let dir = make_test_dir("missing");
    fs::write(dir.join("items.ron"), "[]").unwrap();

    let err = load_catalog(&dir).unwrap_err();
    assert!(matches!(err, DataLoadError::MissingRequired { ref file, .. } if file == "buildings"));

    cleanup(&dir);
}

#[test]
fn conflicting_formats_fail() {
    let dir = make_test_dir("conflict");
    fs::write(dir.join("items.ron"), "[]").unwrap();
    fs::write(dir.join("items.toml"), "items = []").unwrap();
    fs::write(dir.join("buildings.ron"), "[]").unwrap();

    let err = load_catalog(&dir).unwrap_err();
    assert!(matches!(err, DataLoadError::ConflictingFormats { .. }));

    cleanup(&dir);
}

#[test]
fn invalid_entry_reports_file() {
    let dir = make_test_dir("invalid");
    let long_name = "x".repeat(121);
    fs::write(
        dir.join("items.json"),
        format!(r#"[{{"slug": "long", "name": "{long_name}"}}]"#),
    )
    .unwrap();
    fs::write(dir.join("buildings.json"), "[]").unwrap();

    let err = load_catalog(&dir).unwrap_err();
    match err {
        DataLoadError::Domain { file, entry, source } => {
            assert_eq!(file, dir.join("items.json"));
            assert_eq!(entry, "long");
            assert_eq!(source.to_string(), "name must be at most 120 characters.");
        }
        other => panic!("expected Domain error, got {other:?}"),
    }

    cleanup(&dir);
}

#[test]
fn recipe_without_products_fails() {
    let dir = make_test_dir("no_products");
    fs::write(dir.join("items.ron"), r#"[(slug: "iron-ore", name: "Iron Ore")]"#).unwrap();
    fs::write(dir.join("buildings.ron"), "[]").unwrap();
    fs::write(
        dir.join("recipes.ron"),
        r#"[(slug: "void", name: "Void", cycle_seconds: 1.0, ingredients: [("iron-ore", 1.0)], products: [])]"#,
    )
    .unwrap();

    let err = load_catalog(&dir).unwrap_err();
    assert!(matches!(
        err,
        DataLoadError::Domain { ref source, .. } if source.field == "products"
    ));

    cleanup(&dir);
}
