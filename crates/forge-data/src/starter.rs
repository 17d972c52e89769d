//! The embedded reference catalog: a small iron production chain.

use crate::catalog::{Catalog, CatalogBuilder};
use crate::loader::{DataLoadError, Format, parse_list};
use std::path::Path;

/// Slug of the item whose presence marks a store as already seeded.
pub const STARTER_MARKER_SLUG: &str = "iron-ore";

const ITEMS: &str = include_str!("../data/starter/items.ron");
const BUILDINGS: &str = include_str!("../data/starter/buildings.ron");
const RECIPES: &str = include_str!("../data/starter/recipes.ron");
const PLANS: &str = include_str!("../data/starter/plans.ron");

/// Build the starter catalog with freshly generated ids.
pub fn starter_catalog() -> Result<Catalog, DataLoadError> {
    let mut builder = CatalogBuilder::new();

    let path = Path::new("starter/items.ron");
    builder.add_items(path, parse_list(ITEMS, Format::Ron, path, "items")?)?;

    let path = Path::new("starter/buildings.ron");
    builder.add_buildings(path, parse_list(BUILDINGS, Format::Ron, path, "buildings")?)?;

    let path = Path::new("starter/recipes.ron");
    builder.add_recipes(path, parse_list(RECIPES, Format::Ron, path, "recipes")?)?;

    let path = Path::new("starter/plans.ron");
    builder.add_plans(path, parse_list(PLANS, Format::Ron, path, "plans")?)?;

    Ok(builder.finish())
}
