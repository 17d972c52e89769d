//! Catalog assembly: resolves slug references in parsed data into typed ids
//! and builds validated domain aggregates.
//!
//! Items and buildings must be added before the recipes and plans that refer
//! to them. Every reference is normalized with [`forge_core::slug::normalize`]
//! before lookup, so `"Iron Ore"` and `"iron-ore"` resolve to the same item.

use crate::loader::{
    DataLoadError, check_duplicate, deserialize_list, find_data_file, require_data_file,
    resolve_name,
};
use crate::schema::{BuildingData, ItemData, LineData, PlanData, RecipeData};
use forge_core::building::{Building, NewBuilding};
use forge_core::fixed::{Fixed64, checked_from_f64};
use forge_core::id::{BuildingId, ItemId};
use forge_core::item::{Item, NewItem};
use forge_core::line::{LineItem, PlanInput, PlanTarget, RecipeLine};
use forge_core::plan::{NewPlan, Plan};
use forge_core::recipe::{NewRecipe, Recipe};
use forge_core::{DomainError, slug};
use std::collections::{HashMap, HashSet};
use std::path::Path;

// ===========================================================================
// Catalog
// ===========================================================================

/// A validated set of aggregates ready to be persisted.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub buildings: Vec<Building>,
    pub recipes: Vec<Recipe>,
    pub plans: Vec<Plan>,
}

impl Catalog {
    /// Lookups normalize their argument, so `"Iron Ore"` finds `iron-ore`.
    pub fn item_by_slug(&self, slug: &str) -> Option<&Item> {
        let slug = slug::normalize(slug);
        self.items.iter().find(|i| i.slug() == slug)
    }

    pub fn building_by_slug(&self, slug: &str) -> Option<&Building> {
        let slug = slug::normalize(slug);
        self.buildings.iter().find(|b| b.slug() == slug)
    }

    pub fn recipe_by_slug(&self, slug: &str) -> Option<&Recipe> {
        let slug = slug::normalize(slug);
        self.recipes.iter().find(|r| r.slug() == slug)
    }

    pub fn plan_by_slug(&self, slug: &str) -> Option<&Plan> {
        let slug = slug::normalize(slug);
        self.plans.iter().find(|p| p.slug() == slug)
    }

    /// Total number of aggregates.
    pub fn len(&self) -> usize {
        self.items.len() + self.buildings.len() + self.recipes.len() + self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ===========================================================================
// Builder
// ===========================================================================

/// Incrementally resolves parsed data into a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
    item_ids: HashMap<String, ItemId>,
    building_ids: HashMap<String, BuildingId>,
    recipe_slugs: HashSet<String>,
    plan_slugs: HashSet<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_items(&mut self, file: &Path, items: Vec<ItemData>) -> Result<(), DataLoadError> {
        for data in items {
            let key = slug::normalize(&data.slug);
            check_duplicate(self.item_ids.contains_key(&key), &key, file)?;
            let item = Item::create(NewItem {
                slug: data.slug,
                name: data.name,
                description: data.description,
                unit_kind: data.unit_kind,
                is_raw_resource: data.raw_resource,
                id: None,
            })
            .map_err(|source| domain_error(file, &key, source))?;
            self.item_ids.insert(key, item.id());
            self.catalog.items.push(item);
        }
        Ok(())
    }

    pub fn add_buildings(
        &mut self,
        file: &Path,
        buildings: Vec<BuildingData>,
    ) -> Result<(), DataLoadError> {
        for data in buildings {
            let key = slug::normalize(&data.slug);
            check_duplicate(self.building_ids.contains_key(&key), &key, file)?;
            let building = Building::create(NewBuilding {
                slug: data.slug,
                name: data.name,
                description: data.description,
                id: None,
            })
            .map_err(|source| domain_error(file, &key, source))?;
            self.building_ids.insert(key, building.id());
            self.catalog.buildings.push(building);
        }
        Ok(())
    }

    pub fn add_recipes(
        &mut self,
        file: &Path,
        recipes: Vec<RecipeData>,
    ) -> Result<(), DataLoadError> {
        for data in recipes {
            let key = slug::normalize(&data.slug);
            check_duplicate(self.recipe_slugs.contains(&key), &key, file)?;

            let ingredients = self.resolve_lines(&data.ingredients, file)?;
            let products = self.resolve_lines(&data.products, file)?;
            let produced_in = data
                .produced_in
                .iter()
                .map(|b| {
                    resolve_name(&self.building_ids, &slug::normalize(b), file, "building")
                        .copied()
                })
                .collect::<Result<Vec<_>, _>>()?;
            let cycle_seconds = to_fixed(data.cycle_seconds, "cycle_seconds", file, &key)?;

            let recipe = Recipe::create(NewRecipe {
                slug: data.slug,
                name: data.name,
                description: data.description,
                cycle_seconds,
                ingredients,
                products,
                produced_in,
                id: None,
            })
            .map_err(|source| domain_error(file, &key, source))?;
            self.recipe_slugs.insert(key);
            self.catalog.recipes.push(recipe);
        }
        Ok(())
    }

    pub fn add_plans(&mut self, file: &Path, plans: Vec<PlanData>) -> Result<(), DataLoadError> {
        for data in plans {
            let key = slug::normalize(&data.slug);
            check_duplicate(self.plan_slugs.contains(&key), &key, file)?;

            let targets: Vec<PlanTarget> = self.resolve_lines(&data.targets, file)?;
            let available_inputs: Vec<PlanInput> =
                self.resolve_lines(&data.available_inputs, file)?;

            let plan = Plan::create(NewPlan {
                slug: data.slug,
                name: data.name,
                targets,
                available_inputs,
                id: None,
            })
            .map_err(|source| domain_error(file, &key, source))?;
            self.plan_slugs.insert(key);
            self.catalog.plans.push(plan);
        }
        Ok(())
    }

    pub fn finish(self) -> Catalog {
        self.catalog
    }

    fn resolve_lines<L: LineItem>(
        &self,
        lines: &[LineData],
        file: &Path,
    ) -> Result<Vec<L>, DataLoadError> {
        lines
            .iter()
            .map(|line| {
                let key = slug::normalize(line.item());
                let item = *resolve_name(&self.item_ids, &key, file, "item")?;
                Ok(L::new(item, to_fixed(line.amount(), "amount", file, &key)?))
            })
            .collect()
    }
}

fn domain_error(file: &Path, entry: &str, source: DomainError) -> DataLoadError {
    DataLoadError::Domain {
        file: file.to_path_buf(),
        entry: entry.to_string(),
        source,
    }
}

fn to_fixed(
    value: f64,
    field: &str,
    file: &Path,
    entry: &str,
) -> Result<Fixed64, DataLoadError> {
    checked_from_f64(value).ok_or_else(|| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail: format!("{field} {value} for '{entry}' is not representable"),
    })
}

// ===========================================================================
// Directory loading
// ===========================================================================

/// Load a catalog from `items` and `buildings` (required) plus `recipes` and
/// `plans` (optional) data files in `dir`.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let mut builder = CatalogBuilder::new();

    let items_path = require_data_file(dir, "items")?;
    builder.add_items(&items_path, deserialize_list(&items_path, "items")?)?;

    let buildings_path = require_data_file(dir, "buildings")?;
    builder.add_buildings(&buildings_path, deserialize_list(&buildings_path, "buildings")?)?;

    if let Some(path) = find_data_file(dir, "recipes")? {
        builder.add_recipes(&path, deserialize_list(&path, "recipes")?)?;
    }
    if let Some(path) = find_data_file(dir, "plans")? {
        builder.add_plans(&path, deserialize_list(&path, "plans")?)?;
    }

    Ok(builder.finish())
}

// ===========================================================================
// Tests
// ===========================================================================
