//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, downstream crates' tests
//! and benchmarks (via the `test-utils` feature).

use crate::building::{Building, NewBuilding};
use crate::fixed::Fixed64;
use crate::id::{BuildingId, Id, IdKind, ItemId};
use crate::item::{Item, NewItem, UnitKind};
use crate::line::RecipeLine;
use crate::recipe::{NewRecipe, Recipe};
use uuid::{NoContext, Timestamp, Uuid};

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Identifiers
// ===========================================================================

/// A v7 id whose timestamp is exactly `unix_millis`.
pub fn id_at<K: IdKind>(unix_millis: u64) -> Id<K> {
    let ts = Timestamp::from_unix(
        NoContext,
        unix_millis / 1000,
        ((unix_millis % 1000) * 1_000_000) as u32,
    );
    Id::from_uuid(Uuid::new_v7(ts))
}

/// `n` ids with strictly increasing timestamps, one millisecond apart.
pub fn sequential_ids<K: IdKind>(n: usize) -> Vec<Id<K>> {
    const BASE_MILLIS: u64 = 1_700_000_000_000;
    (0..n as u64).map(|i| id_at(BASE_MILLIS + i)).collect()
}

// ===========================================================================
// Aggregate constructors
// ===========================================================================

pub fn make_item(slug: &str, name: &str) -> Item {
    Item::create(NewItem {
        slug: slug.to_string(),
        name: name.to_string(),
        ..Default::default()
    })
    .expect("valid test item")
}

pub fn make_raw_item(slug: &str, name: &str) -> Item {
    Item::create(NewItem {
        slug: slug.to_string(),
        name: name.to_string(),
        unit_kind: UnitKind::Item,
        is_raw_resource: true,
        ..Default::default()
    })
    .expect("valid test item")
}

pub fn make_building(slug: &str, name: &str) -> Building {
    Building::create(NewBuilding {
        slug: slug.to_string(),
        name: name.to_string(),
        ..Default::default()
    })
    .expect("valid test building")
}

pub fn lines(entries: &[(ItemId, f64)]) -> Vec<RecipeLine> {
    entries
        .iter()
        .map(|&(item, amount)| RecipeLine::new(item, fixed(amount)))
        .collect()
}

pub fn make_recipe(
    slug: &str,
    ingredients: &[(ItemId, f64)],
    products: &[(ItemId, f64)],
    cycle_seconds: f64,
    produced_in: &[BuildingId],
) -> Recipe {
    Recipe::create(NewRecipe {
        slug: slug.to_string(),
        name: slug.to_string(),
        cycle_seconds: fixed(cycle_seconds),
        ingredients: lines(ingredients),
        products: lines(products),
        produced_in: produced_in.to_vec(),
        ..Default::default()
    })
    .expect("valid test recipe")
}

// ===========================================================================
// Fixtures
// ===========================================================================

/// Iron ore smelted into iron ingots in a smelter.
#[derive(Debug, Clone)]
pub struct SmeltingFixture {
    pub iron_ore: Item,
    pub iron_ingot: Item,
    pub smelter: Building,
    pub recipe: Recipe,
}

pub fn smelting_fixture() -> SmeltingFixture {
    let iron_ore = make_raw_item("iron-ore", "Iron Ore");
    let iron_ingot = make_item("iron-ingot", "Iron Ingot");
    let smelter = make_building("smelter", "Smelter");
    let recipe = Recipe::create(NewRecipe {
        slug: "smelt-iron-ore".to_string(),
        name: "Smelt Iron Ore".to_string(),
        cycle_seconds: fixed(1.0),
        ingredients: lines(&[(iron_ore.id(), 1.0)]),
        products: lines(&[(iron_ingot.id(), 1.0)]),
        produced_in: vec![smelter.id()],
        ..Default::default()
    })
    .expect("valid smelting recipe");

    SmeltingFixture {
        iron_ore,
        iron_ingot,
        smelter,
        recipe,
    }
}
