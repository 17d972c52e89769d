//! Reading aggregates back.
//!
//! Rows are mapped into the `New*` inputs and rebuilt through the domain
//! factories, so anything loaded satisfies the same invariants as anything
//! created. Audit stamps are restored afterwards.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use forge_core::audit::{AuditStamps, Auditable};
use forge_core::building::{Building, NewBuilding};
use forge_core::codec::StorageKey;
use forge_core::fixed::fixed64_from_bits;
use forge_core::id::{BuildingId, BuildingKind, Id, IdKind, ItemId, PlanId, RecipeId};
use forge_core::item::{Item, NewItem, UnitKind};
use forge_core::line::LineItem;
use forge_core::plan::{NewPlan, Plan};
use forge_core::recipe::{NewRecipe, Recipe};
use rusqlite::{Connection, OptionalExtension, Params, Row};

// ===========================================================================
// Column decoding
// ===========================================================================

pub(crate) fn decode_key<K: IdKind>(
    bytes: Vec<u8>,
    table: &'static str,
    column: &'static str,
) -> StoreResult<Id<K>> {
    let stored: [u8; 16] = bytes.try_into().map_err(|raw: Vec<u8>| StoreError::Corrupt {
        table,
        column,
        detail: format!("expected 16 bytes, found {}", raw.len()),
    })?;
    Ok(Id::from_storage_bytes(stored))
}

fn restore<A: Auditable>(
    mut aggregate: A,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
) -> A {
    *aggregate.audit_mut() = AuditStamps::restored(created_utc, updated_utc);
    aggregate
}

fn load_lines<L: LineItem>(
    conn: &Connection,
    table: &'static str,
    owner_column: &str,
    owner: &[u8; 16],
) -> StoreResult<Vec<L>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT item_id, amount_bits FROM {table} WHERE {owner_column} = ?1 ORDER BY position"
    ))?;
    let rows = stmt
        .query_map([&owner[..]], |row| {
            Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(item, bits)| -> StoreResult<L> {
            let item: ItemId = decode_key(item, table, "item_id")?;
            Ok(L::new(item, fixed64_from_bits(bits)))
        })
        .collect()
}

// ===========================================================================
// Items
// ===========================================================================

const ITEM_COLUMNS: &str =
    "id, slug, name, description, unit_kind, is_raw_resource, created_utc, updated_utc";

struct ItemRow {
    id: Vec<u8>,
    slug: String,
    name: String,
    description: Option<String>,
    unit_kind: u8,
    is_raw_resource: bool,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
}

impl ItemRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slug: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            unit_kind: row.get(4)?,
            is_raw_resource: row.get(5)?,
            created_utc: row.get(6)?,
            updated_utc: row.get(7)?,
        })
    }

    fn into_item(self) -> StoreResult<Item> {
        let unit_kind = UnitKind::from_u8(self.unit_kind).ok_or_else(|| StoreError::Corrupt {
            table: "items",
            column: "unit_kind",
            detail: format!("unknown unit kind {}", self.unit_kind),
        })?;
        let item = Item::create(NewItem {
            slug: self.slug,
            name: self.name,
            description: self.description,
            unit_kind,
            is_raw_resource: self.is_raw_resource,
            id: Some(decode_key(self.id, "items", "id")?),
        })?;
        Ok(restore(item, self.created_utc, self.updated_utc))
    }
}

fn query_items<P: Params>(conn: &Connection, filter: &str, params: P) -> StoreResult<Vec<Item>> {
    let mut stmt = conn.prepare(&format!("SELECT {ITEM_COLUMNS} FROM items {filter}"))?;
    let rows = stmt
        .query_map(params, ItemRow::read)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(ItemRow::into_item).collect()
}

pub fn item(conn: &Connection, id: ItemId) -> StoreResult<Option<Item>> {
    let key = id.storage_bytes();
    Ok(query_items(conn, "WHERE id = ?1", [&key[..]])?.into_iter().next())
}

pub fn item_by_slug(conn: &Connection, slug: &str) -> StoreResult<Option<Item>> {
    Ok(query_items(conn, "WHERE slug = ?1", [slug])?.into_iter().next())
}

/// All items, ordered by storage key.
pub fn items(conn: &Connection) -> StoreResult<Vec<Item>> {
    query_items(conn, "ORDER BY id", [])
}

// ===========================================================================
// Buildings
// ===========================================================================

const BUILDING_COLUMNS: &str = "id, slug, name, description, created_utc, updated_utc";

fn read_building(row: &Row<'_>) -> rusqlite::Result<(Vec<u8>, NewBuilding, DateTime<Utc>, DateTime<Utc>)> {
    Ok((
        row.get(0)?,
        NewBuilding {
            slug: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            id: None,
        },
        row.get(4)?,
        row.get(5)?,
    ))
}

fn query_buildings<P: Params>(conn: &Connection, filter: &str, params: P) -> StoreResult<Vec<Building>> {
    let mut stmt = conn.prepare(&format!("SELECT {BUILDING_COLUMNS} FROM buildings {filter}"))?;
    let rows = stmt
        .query_map(params, read_building)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(key, mut new, created, updated)| -> StoreResult<Building> {
            new.id = Some(decode_key::<BuildingKind>(key, "buildings", "id")?);
            Ok(restore(Building::create(new)?, created, updated))
        })
        .collect()
}

pub fn building(conn: &Connection, id: BuildingId) -> StoreResult<Option<Building>> {
    let key = id.storage_bytes();
    Ok(query_buildings(conn, "WHERE id = ?1", [&key[..]])?.into_iter().next())
}

pub fn building_by_slug(conn: &Connection, slug: &str) -> StoreResult<Option<Building>> {
    Ok(query_buildings(conn, "WHERE slug = ?1", [slug])?.into_iter().next())
}

/// All buildings, ordered by storage key.
pub fn buildings(conn: &Connection) -> StoreResult<Vec<Building>> {
    query_buildings(conn, "ORDER BY id", [])
}

// ===========================================================================
// Recipes
// ===========================================================================

const RECIPE_COLUMNS: &str =
    "id, slug, name, description, cycle_seconds_bits, created_utc, updated_utc";

struct RecipeRow {
    id: Vec<u8>,
    slug: String,
    name: String,
    description: Option<String>,
    cycle_seconds_bits: i64,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
}

impl RecipeRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slug: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            cycle_seconds_bits: row.get(4)?,
            created_utc: row.get(5)?,
            updated_utc: row.get(6)?,
        })
    }

    fn into_recipe(self, conn: &Connection) -> StoreResult<Recipe> {
        let id: RecipeId = decode_key(self.id, "recipes", "id")?;
        let key = id.storage_bytes();

        let mut stmt = conn.prepare_cached(
            "SELECT building_id FROM recipe_produced_in WHERE recipe_id = ?1",
        )?;
        let produced_in = stmt
            .query_map([&key[..]], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|b| decode_key(b, "recipe_produced_in", "building_id"))
            .collect::<StoreResult<Vec<BuildingId>>>()?;

        let recipe = Recipe::create(NewRecipe {
            slug: self.slug,
            name: self.name,
            description: self.description,
            cycle_seconds: fixed64_from_bits(self.cycle_seconds_bits),
            ingredients: load_lines(conn, "recipe_ingredients", "recipe_id", &key)?,
            products: load_lines(conn, "recipe_products", "recipe_id", &key)?,
            produced_in,
            id: Some(id),
        })?;
        Ok(restore(recipe, self.created_utc, self.updated_utc))
    }
}

fn query_recipes<P: Params>(conn: &Connection, filter: &str, params: P) -> StoreResult<Vec<Recipe>> {
    let mut stmt = conn.prepare(&format!("SELECT {RECIPE_COLUMNS} FROM recipes {filter}"))?;
    let rows = stmt
        .query_map(params, RecipeRow::read)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(|row| row.into_recipe(conn)).collect()
}

pub fn recipe(conn: &Connection, id: RecipeId) -> StoreResult<Option<Recipe>> {
    let key = id.storage_bytes();
    Ok(query_recipes(conn, "WHERE id = ?1", [&key[..]])?.into_iter().next())
}

pub fn recipe_by_slug(conn: &Connection, slug: &str) -> StoreResult<Option<Recipe>> {
    Ok(query_recipes(conn, "WHERE slug = ?1", [slug])?.into_iter().next())
}

/// All recipes, ordered by storage key.
pub fn recipes(conn: &Connection) -> StoreResult<Vec<Recipe>> {
    query_recipes(conn, "ORDER BY id", [])
}

// ===========================================================================
// Plans
// ===========================================================================

const PLAN_COLUMNS: &str = "id, slug, name, created_utc, updated_utc";

fn read_plan(row: &Row<'_>) -> rusqlite::Result<(Vec<u8>, String, String, DateTime<Utc>, DateTime<Utc>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn query_plans<P: Params>(conn: &Connection, filter: &str, params: P) -> StoreResult<Vec<Plan>> {
    let mut stmt = conn.prepare(&format!("SELECT {PLAN_COLUMNS} FROM plans {filter}"))?;
    let rows = stmt
        .query_map(params, read_plan)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(raw_id, slug, name, created, updated)| -> StoreResult<Plan> {
            let id: PlanId = decode_key(raw_id, "plans", "id")?;
            let key = id.storage_bytes();
            let plan = Plan::create(NewPlan {
                slug,
                name,
                targets: load_lines(conn, "plan_targets", "plan_id", &key)?,
                available_inputs: load_lines(conn, "plan_inputs", "plan_id", &key)?,
                id: Some(id),
            })?;
            Ok(restore(plan, created, updated))
        })
        .collect()
}

pub fn plan(conn: &Connection, id: PlanId) -> StoreResult<Option<Plan>> {
    let key = id.storage_bytes();
    Ok(query_plans(conn, "WHERE id = ?1", [&key[..]])?.into_iter().next())
}

pub fn plan_by_slug(conn: &Connection, slug: &str) -> StoreResult<Option<Plan>> {
    Ok(query_plans(conn, "WHERE slug = ?1", [slug])?.into_iter().next())
}

/// All plans, ordered by storage key.
pub fn plans(conn: &Connection) -> StoreResult<Vec<Plan>> {
    query_plans(conn, "ORDER BY id", [])
}

// ===========================================================================
// Counts
// ===========================================================================

pub fn count(conn: &Connection, table: &'static str) -> StoreResult<usize> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(n as usize)
}

/// True when any row in `table` has the given slug.
pub fn slug_exists(conn: &Connection, table: &'static str, slug: &str) -> StoreResult<bool> {
    Ok(conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE slug = ?1"),
            [slug],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}
