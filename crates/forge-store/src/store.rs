use crate::config::StoreConfig;
use crate::db;
use crate::error::{StoreError, StoreResult};
use crate::persist::Persist;
use crate::query;
use chrono::{DateTime, Utc};
use forge_core::audit::{AuditStamps, SaveState, stamp};
use forge_core::building::Building;
use forge_core::codec::StorageKey;
use forge_core::id::{BuildingId, ItemId, PlanId, RecipeId};
use forge_core::item::Item;
use forge_core::plan::Plan;
use forge_core::recipe::Recipe;
use forge_core::slug;
use rusqlite::Connection;
use tracing::{debug, info};

// ===========================================================================
// Change sets
// ===========================================================================

/// A batch of aggregates saved together: one transaction, one timestamp.
#[derive(Default)]
pub struct ChangeSet<'a> {
    entries: Vec<(&'a mut dyn Persist, SaveState)>,
}

impl<'a> ChangeSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<A: Persist + 'a>(&mut self, aggregate: &'a mut A, state: SaveState) -> &mut Self {
        self.entries.push((aggregate, state));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Row counts per aggregate table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub items: usize,
    pub buildings: usize,
    pub recipes: usize,
    pub plans: usize,
}

// ===========================================================================
// Store
// ===========================================================================

/// The catalog database. Single connection, used from one thread at a time.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the configured database and ensure the schema.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let conn = db::open_connection(config)?;
        db::ensure_schema(&conn)?;
        info!(database = %config.database, "store opened");
        Ok(Self { conn })
    }

    /// A private in-memory database with default settings.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&StoreConfig::default())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Stamp and persist a single aggregate.
    pub fn save<A: Persist>(&mut self, aggregate: &mut A, state: SaveState) -> StoreResult<()> {
        let mut changes = ChangeSet::new();
        changes.add(aggregate, state);
        self.commit(changes).map(|_| ())
    }

    /// Persist a batch, stamped with the current time.
    pub fn commit(&mut self, changes: ChangeSet<'_>) -> StoreResult<usize> {
        self.commit_at(changes, Utc::now())
    }

    /// Persist a batch with an explicit `now`.
    ///
    /// Either every aggregate is written or none is. On failure the audit
    /// stamps of every aggregate in the batch are put back as they were.
    pub fn commit_at(&mut self, changes: ChangeSet<'_>, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut entries = changes.entries;
        if entries.is_empty() {
            return Ok(0);
        }

        let previous: Vec<AuditStamps> = entries.iter().map(|(a, _)| *a.audit()).collect();
        let result = self.write_all(&mut entries, now);
        if result.is_err() {
            for ((aggregate, _), stamps) in entries.iter_mut().zip(previous) {
                *aggregate.audit_mut() = stamps;
            }
        }
        result
    }

    fn write_all(
        &mut self,
        entries: &mut [(&mut dyn Persist, SaveState)],
        now: DateTime<Utc>,
    ) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        for (aggregate, state) in entries.iter_mut() {
            stamp(&mut **aggregate, *state, now);
            match state {
                SaveState::New => aggregate.insert(&tx)?,
                SaveState::Modified => {
                    if aggregate.update(&tx)? == 0 {
                        return Err(StoreError::NotFound {
                            kind: aggregate.kind(),
                            id: aggregate.id_string(),
                        });
                    }
                }
            }
            debug!(
                kind = aggregate.kind(),
                id = %aggregate.id_string(),
                state = ?state,
                "persisted aggregate"
            );
        }
        tx.commit()?;
        info!(aggregates = entries.len(), "committed change set");
        Ok(entries.len())
    }

    // -----------------------------------------------------------------------
    // Deletes
    // -----------------------------------------------------------------------

    fn delete_rows(
        &mut self,
        kind: &'static str,
        id: String,
        key: [u8; 16],
        root: &str,
        children: &[(&str, &str)],
    ) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        for (table, owner_column) in children {
            tx.execute(
                &format!("DELETE FROM {table} WHERE {owner_column} = ?1"),
                [&key[..]],
            )?;
        }
        let deleted = tx.execute(&format!("DELETE FROM {root} WHERE id = ?1"), [&key[..]])?;
        if deleted == 0 {
            return Err(StoreError::NotFound { kind, id });
        }
        tx.commit()?;
        debug!(kind, id = %id, "deleted aggregate");
        Ok(())
    }

    pub fn delete_item(&mut self, id: ItemId) -> StoreResult<()> {
        self.delete_rows("item", id.to_string(), id.storage_bytes(), "items", &[])
    }

    pub fn delete_building(&mut self, id: BuildingId) -> StoreResult<()> {
        self.delete_rows("building", id.to_string(), id.storage_bytes(), "buildings", &[])
    }

    pub fn delete_recipe(&mut self, id: RecipeId) -> StoreResult<()> {
        self.delete_rows(
            "recipe",
            id.to_string(),
            id.storage_bytes(),
            "recipes",
            &[
                ("recipe_ingredients", "recipe_id"),
                ("recipe_products", "recipe_id"),
                ("recipe_produced_in", "recipe_id"),
            ],
        )
    }

    pub fn delete_plan(&mut self, id: PlanId) -> StoreResult<()> {
        self.delete_rows(
            "plan",
            id.to_string(),
            id.storage_bytes(),
            "plans",
            &[("plan_targets", "plan_id"), ("plan_inputs", "plan_id")],
        )
    }

    // -----------------------------------------------------------------------
    // Loads
    // -----------------------------------------------------------------------

    pub fn item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        query::item(&self.conn, id)
    }

    /// Lookup by slug; the argument is normalized first.
    pub fn item_by_slug(&self, slug: &str) -> StoreResult<Option<Item>> {
        query::item_by_slug(&self.conn, &slug::normalize(slug))
    }

    pub fn items(&self) -> StoreResult<Vec<Item>> {
        query::items(&self.conn)
    }

    pub fn building(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        query::building(&self.conn, id)
    }

    pub fn building_by_slug(&self, slug: &str) -> StoreResult<Option<Building>> {
        query::building_by_slug(&self.conn, &slug::normalize(slug))
    }

    pub fn buildings(&self) -> StoreResult<Vec<Building>> {
        query::buildings(&self.conn)
    }

    pub fn recipe(&self, id: RecipeId) -> StoreResult<Option<Recipe>> {
        query::recipe(&self.conn, id)
    }

    pub fn recipe_by_slug(&self, slug: &str) -> StoreResult<Option<Recipe>> {
        query::recipe_by_slug(&self.conn, &slug::normalize(slug))
    }

    pub fn recipes(&self) -> StoreResult<Vec<Recipe>> {
        query::recipes(&self.conn)
    }

    pub fn plan(&self, id: PlanId) -> StoreResult<Option<Plan>> {
        query::plan(&self.conn, id)
    }

    pub fn plan_by_slug(&self, slug: &str) -> StoreResult<Option<Plan>> {
        query::plan_by_slug(&self.conn, &slug::normalize(slug))
    }

    pub fn plans(&self) -> StoreResult<Vec<Plan>> {
        query::plans(&self.conn)
    }

    /// True when an item with this (normalized) slug exists.
    pub fn item_slug_exists(&self, slug: &str) -> StoreResult<bool> {
        query::slug_exists(&self.conn, "items", &slug::normalize(slug))
    }

    pub fn counts(&self) -> StoreResult<CatalogCounts> {
        Ok(CatalogCounts {
            items: query::count(&self.conn, "items")?,
            buildings: query::count(&self.conn, "buildings")?,
            recipes: query::count(&self.conn, "recipes")?,
            plans: query::count(&self.conn, "plans")?,
        })
    }
}
