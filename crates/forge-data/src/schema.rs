//! Serde data file structs for catalog definitions.
//!
//! These structs define the on-disk format for items, buildings, recipes and
//! plans. They are deserialized from RON, JSON, or TOML data files and then
//! resolved into domain aggregates by the catalog builder. Cross-references
//! are written as slugs.

use forge_core::item::UnitKind;
use serde::Deserialize;

// ===========================================================================
// Items and buildings
// ===========================================================================

/// An item definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit_kind: UnitKind,
    #[serde(default)]
    pub raw_resource: bool,
}

/// A building definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingData {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ===========================================================================
// Lines
// ===========================================================================

/// An (item, amount per cycle) entry, supporting both the short tuple form
/// and a full form with named fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LineData {
    /// Short form: `("iron-ore", 1.0)`.
    Short(String, f64),
    /// Full form: a map with `item` and `amount` keys.
    Full { item: String, amount: f64 },
}

impl LineData {
    pub fn item(&self) -> &str {
        match self {
            LineData::Short(item, _) | LineData::Full { item, .. } => item,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            LineData::Short(_, amount) | LineData::Full { amount, .. } => *amount,
        }
    }
}

// ===========================================================================
// Recipes and plans
// ===========================================================================

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cycle_seconds: f64,
    pub ingredients: Vec<LineData>,
    pub products: Vec<LineData>,
    /// Building slugs.
    #[serde(default)]
    pub produced_in: Vec<String>,
}

/// A plan definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanData {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub targets: Vec<LineData>,
    #[serde(default)]
    pub available_inputs: Vec<LineData>,
}

// ===========================================================================
// Tests
// ===========================================================================
