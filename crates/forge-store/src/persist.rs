//! Writing aggregates: one [`Persist`] impl per aggregate.
//!
//! `insert` writes a never-seen aggregate; `update` rewrites the root row and
//! replaces every child row. Both run inside the caller's transaction.

use crate::error::StoreResult;
use forge_core::audit::Auditable;
use forge_core::building::Building;
use forge_core::codec::StorageKey;
use forge_core::fixed::fixed64_to_bits;
use forge_core::item::Item;
use forge_core::line::LineItem;
use forge_core::plan::Plan;
use forge_core::recipe::Recipe;
use rusqlite::{Connection, params};

/// An aggregate the store knows how to write.
pub trait Persist: Auditable {
    /// Table-style name used in logs and `NotFound` errors.
    fn kind(&self) -> &'static str;

    /// Display form of the id (time-ordered, not storage order).
    fn id_string(&self) -> String;

    fn insert(&self, conn: &Connection) -> StoreResult<()>;

    /// Returns the number of root rows updated (0 when the id is unknown).
    fn update(&self, conn: &Connection) -> StoreResult<usize>;
}

fn write_lines<L: LineItem>(
    conn: &Connection,
    table: &str,
    owner_column: &str,
    owner: &[u8; 16],
    lines: &[L],
) -> StoreResult<()> {
    conn.execute(
        &format!("DELETE FROM {table} WHERE {owner_column} = ?1"),
        [&owner[..]],
    )?;
    let mut stmt = conn.prepare_cached(&format!(
        "INSERT INTO {table} ({owner_column}, item_id, amount_bits, position)
         VALUES (?1, ?2, ?3, ?4)"
    ))?;
    for (position, line) in lines.iter().enumerate() {
        let item = line.item_id().storage_bytes();
        stmt.execute(params![
            &owner[..],
            &item[..],
            fixed64_to_bits(line.amount_per_cycle()),
            position as i64,
        ])?;
    }
    Ok(())
}

// ===========================================================================
// Item
// ===========================================================================

impl Persist for Item {
    fn kind(&self) -> &'static str {
        "item"
    }

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn insert(&self, conn: &Connection) -> StoreResult<()> {
        let key = self.id().storage_bytes();
        conn.execute(
            "INSERT INTO items
                (id, slug, name, description, unit_kind, is_raw_resource, created_utc, updated_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.description(),
                self.unit_kind().as_u8(),
                self.is_raw_resource(),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> StoreResult<usize> {
        let key = self.id().storage_bytes();
        Ok(conn.execute(
            "UPDATE items
             SET slug = ?2, name = ?3, description = ?4, unit_kind = ?5,
                 is_raw_resource = ?6, created_utc = ?7, updated_utc = ?8
             WHERE id = ?1",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.description(),
                self.unit_kind().as_u8(),
                self.is_raw_resource(),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?)
    }
}

// ===========================================================================
// Building
// ===========================================================================

impl Persist for Building {
    fn kind(&self) -> &'static str {
        "building"
    }

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn insert(&self, conn: &Connection) -> StoreResult<()> {
        let key = self.id().storage_bytes();
        conn.execute(
            "INSERT INTO buildings (id, slug, name, description, created_utc, updated_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.description(),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> StoreResult<usize> {
        let key = self.id().storage_bytes();
        Ok(conn.execute(
            "UPDATE buildings
             SET slug = ?2, name = ?3, description = ?4, created_utc = ?5, updated_utc = ?6
             WHERE id = ?1",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.description(),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?)
    }
}

// ===========================================================================
// Recipe
// ===========================================================================

fn write_recipe_children(recipe: &Recipe, conn: &Connection, key: &[u8; 16]) -> StoreResult<()> {
    write_lines(conn, "recipe_ingredients", "recipe_id", key, recipe.ingredients())?;
    write_lines(conn, "recipe_products", "recipe_id", key, recipe.products())?;

    conn.execute("DELETE FROM recipe_produced_in WHERE recipe_id = ?1", [&key[..]])?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO recipe_produced_in (recipe_id, building_id) VALUES (?1, ?2)",
    )?;
    for building in recipe.produced_in() {
        let building = building.storage_bytes();
        stmt.execute(params![&key[..], &building[..]])?;
    }
    Ok(())
}

impl Persist for Recipe {
    fn kind(&self) -> &'static str {
        "recipe"
    }

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn insert(&self, conn: &Connection) -> StoreResult<()> {
        let key = self.id().storage_bytes();
        conn.execute(
            "INSERT INTO recipes
                (id, slug, name, description, cycle_seconds_bits, created_utc, updated_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.description(),
                fixed64_to_bits(self.cycle_seconds()),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?;
        write_recipe_children(self, conn, &key)
    }

    fn update(&self, conn: &Connection) -> StoreResult<usize> {
        let key = self.id().storage_bytes();
        let updated = conn.execute(
            "UPDATE recipes
             SET slug = ?2, name = ?3, description = ?4, cycle_seconds_bits = ?5,
                 created_utc = ?6, updated_utc = ?7
             WHERE id = ?1",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.description(),
                fixed64_to_bits(self.cycle_seconds()),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?;
        if updated > 0 {
            write_recipe_children(self, conn, &key)?;
        }
        Ok(updated)
    }
}

// ===========================================================================
// Plan
// ===========================================================================

fn write_plan_children(plan: &Plan, conn: &Connection, key: &[u8; 16]) -> StoreResult<()> {
    write_lines(conn, "plan_targets", "plan_id", key, plan.targets())?;
    write_lines(conn, "plan_inputs", "plan_id", key, plan.available_inputs())
}

impl Persist for Plan {
    fn kind(&self) -> &'static str {
        "plan"
    }

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn insert(&self, conn: &Connection) -> StoreResult<()> {
        let key = self.id().storage_bytes();
        conn.execute(
            "INSERT INTO plans (id, slug, name, created_utc, updated_utc)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?;
        write_plan_children(self, conn, &key)
    }

    fn update(&self, conn: &Connection) -> StoreResult<usize> {
        let key = self.id().storage_bytes();
        let updated = conn.execute(
            "UPDATE plans SET slug = ?2, name = ?3, created_utc = ?4, updated_utc = ?5
             WHERE id = ?1",
            params![
                &key[..],
                self.slug(),
                self.name(),
                self.audit().created_utc(),
                self.audit().updated_utc(),
            ],
        )?;
        if updated > 0 {
            write_plan_children(self, conn, &key)?;
        }
        Ok(updated)
    }
}
