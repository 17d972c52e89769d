//! Integration tests for the Forge domain model.
//!
//! These tests exercise end-to-end catalog construction across items,
//! buildings, recipes and plans, plus the audit save path.

use chrono::{TimeZone, Utc};
use forge_core::audit::{Auditable, SaveState, stamp};
use forge_core::fixed::Fixed64;
use forge_core::line::*;
use forge_core::plan::{NewPlan, Plan};
use forge_core::recipe::{NewRecipe, Recipe};
use forge_core::test_utils::*;

// ===========================================================================
// Test 1: Smelting scenario
// ===========================================================================
//
// Iron Ore (raw) --[Smelter, 1.0s]--> Iron Ingot

#[test]
fn smelting_scenario() {
    let f = smelting_fixture();

    assert_eq!(f.iron_ore.slug(), "iron-ore");
    assert!(f.iron_ore.is_raw_resource());
    assert!(!f.iron_ingot.is_raw_resource());

    let ingredients = f.recipe.ingredients();
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0].item_id(), f.iron_ore.id());
    assert_eq!(ingredients[0].amount_per_cycle(), fixed(1.0));

    let products = f.recipe.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].item_id(), f.iron_ingot.id());
    assert_eq!(products[0].amount_per_cycle(), fixed(1.0));

    let produced_in: Vec<_> = f.recipe.produced_in().collect();
    assert_eq!(produced_in, vec![f.smelter.id()]);
    assert_eq!(f.recipe.cycle_seconds(), fixed(1.0));
}

// ===========================================================================
// Test 2: Screw chain with a plan
// ===========================================================================

#[test]
fn screw_chain_with_plan() {
    let ingot = make_item("iron-ingot", "Iron Ingot");
    let rod = make_item("iron-rod", "Iron Rod");
    let screw = make_item("screw", "Screw");
    let ore = make_raw_item("iron-ore", "Iron Ore");
    let constructor = make_building("constructor", "Constructor");

    let make_rod = make_recipe("iron-rod", &[(ingot.id(), 1.0)], &[(rod.id(), 1.0)], 4.0, &[constructor.id()]);
    let make_screw = make_recipe("screw", &[(rod.id(), 1.0)], &[(screw.id(), 4.0)], 1.5, &[constructor.id()]);

    assert_eq!(make_rod.products()[0].item_id(), make_screw.ingredients()[0].item_id());
    assert_eq!(make_screw.products()[0].amount_per_cycle(), fixed(4.0));

    let mut plan = Plan::create(NewPlan {
        slug: "starter-plan".into(),
        name: "Starter Plan".into(),
        ..Default::default()
    })
    .unwrap();
    plan.replace_targets([PlanTarget::new(screw.id(), fixed(40.0))]).unwrap();
    plan.replace_available_inputs([PlanInput::new(ore.id(), fixed(120.0))]).unwrap();

    assert_eq!(plan.targets().len(), 1);
    assert_eq!(plan.available_inputs()[0].amount_per_cycle(), fixed(120.0));
}

// ===========================================================================
// Test 3: Recipe creation failures leave nothing behind
// ===========================================================================

#[test]
fn recipe_create_requires_both_sides() {
    let ore = make_raw_item("iron-ore", "Iron Ore");
    let base = NewRecipe {
        slug: "broken".into(),
        name: "Broken".into(),
        cycle_seconds: fixed(1.0),
        ingredients: lines(&[(ore.id(), 1.0)]),
        products: lines(&[(ore.id(), 1.0)]),
        ..Default::default()
    };

    let no_ingredients = NewRecipe {
        ingredients: Vec::new(),
        ..base.clone()
    };
    assert_eq!(Recipe::create(no_ingredients).unwrap_err().field, "ingredients");

    let no_products = NewRecipe {
        products: Vec::new(),
        ..base.clone()
    };
    assert_eq!(Recipe::create(no_products).unwrap_err().field, "products");

    assert!(Recipe::create(base).is_ok());
}

#[test]
fn recipe_cycle_time_bounds() {
    let ore = make_raw_item("iron-ore", "Iron Ore");
    let with_cycle = |secs: Fixed64| {
        Recipe::create(NewRecipe {
            slug: "bounded".into(),
            name: "Bounded".into(),
            cycle_seconds: secs,
            ingredients: lines(&[(ore.id(), 1.0)]),
            products: lines(&[(ore.id(), 1.0)]),
            ..Default::default()
        })
    };
    assert!(with_cycle(fixed(0.0)).is_err());
    assert!(with_cycle(fixed(3600.0)).is_ok());
    assert!(with_cycle(fixed(3600.01)).is_err());
}

// ===========================================================================
// Test 4: Audit save path
// ===========================================================================

#[test]
fn audit_stamps_follow_save_states() {
    let mut f = smelting_fixture();
    assert!(f.recipe.audit().created_utc().is_none());

    let first = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();

    stamp(&mut f.recipe, SaveState::New, first);
    f.recipe.rename("Smelt Iron Ore (Alt)").unwrap();
    stamp(&mut f.recipe, SaveState::Modified, second);

    assert_eq!(f.recipe.audit().created_utc(), Some(first));
    assert_eq!(f.recipe.audit().updated_utc(), Some(second));
}
