//! Idempotent catalog seeding.

use crate::config::SeedSource;
use crate::error::StoreResult;
use crate::store::{ChangeSet, Store};
use forge_core::audit::SaveState;
use forge_data::{Catalog, STARTER_MARKER_SLUG, load_catalog, starter_catalog};
use tracing::{info, warn};

/// What a seeding call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The marker item was already present; nothing was written.
    Skipped,
    Seeded { aggregates: usize },
}

/// Insert every aggregate of `catalog` unless an item with `marker_slug`
/// already exists. Items and buildings are written before the recipes and
/// plans that refer to them.
pub fn seed_catalog(
    store: &mut Store,
    catalog: &mut Catalog,
    marker_slug: &str,
) -> StoreResult<SeedOutcome> {
    if store.item_slug_exists(marker_slug)? {
        warn!(marker = marker_slug, "catalog already seeded, skipping");
        return Ok(SeedOutcome::Skipped);
    }

    let mut changes = ChangeSet::new();
    for item in &mut catalog.items {
        changes.add(item, SaveState::New);
    }
    for building in &mut catalog.buildings {
        changes.add(building, SaveState::New);
    }
    for recipe in &mut catalog.recipes {
        changes.add(recipe, SaveState::New);
    }
    for plan in &mut catalog.plans {
        changes.add(plan, SaveState::New);
    }

    let aggregates = store.commit(changes)?;
    info!(aggregates, marker = marker_slug, "catalog seeded");
    Ok(SeedOutcome::Seeded { aggregates })
}

/// Seed the embedded starter catalog, keyed on `iron-ore`.
pub fn seed_starter(store: &mut Store) -> StoreResult<SeedOutcome> {
    let mut catalog = starter_catalog()?;
    seed_catalog(store, &mut catalog, STARTER_MARKER_SLUG)
}

/// Seed according to configuration. A directory catalog is keyed on its
/// first item; an empty directory catalog seeds nothing.
pub fn seed_from_source(store: &mut Store, source: &SeedSource) -> StoreResult<SeedOutcome> {
    match source {
        SeedSource::None => Ok(SeedOutcome::Skipped),
        SeedSource::Starter => seed_starter(store),
        SeedSource::Dir(dir) => {
            let mut catalog = load_catalog(dir)?;
            let Some(marker) = catalog.items.first().map(|i| i.slug().to_string()) else {
                warn!(dir = %dir.display(), "catalog directory has no items, skipping");
                return Ok(SeedOutcome::Skipped);
            };
            seed_catalog(store, &mut catalog, &marker)
        }
    }
}
