//! Connection setup and schema.
//!
//! Identity columns are 16-byte BLOBs in storage order and every table is
//! `WITHOUT ROWID`, so rows are clustered on the id itself. Amounts are the
//! raw `Fixed64` bits. Line tables keep a `position` so plan lines come back
//! in the order they were consolidated.

use crate::config::StoreConfig;
use rusqlite::{Connection, OptionalExtension};
use std::time::Duration;
use tracing::info;

/// Bumped whenever [`SCHEMA`] changes shape.
pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id              BLOB PRIMARY KEY NOT NULL CHECK (length(id) = 16),
    slug            TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    description     TEXT,
    unit_kind       INTEGER NOT NULL,
    is_raw_resource INTEGER NOT NULL,
    created_utc     TEXT NOT NULL,
    updated_utc     TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS buildings (
    id          BLOB PRIMARY KEY NOT NULL CHECK (length(id) = 16),
    slug        TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    description TEXT,
    created_utc TEXT NOT NULL,
    updated_utc TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS recipes (
    id                 BLOB PRIMARY KEY NOT NULL CHECK (length(id) = 16),
    slug               TEXT NOT NULL UNIQUE,
    name               TEXT NOT NULL,
    description        TEXT,
    cycle_seconds_bits INTEGER NOT NULL,
    created_utc        TEXT NOT NULL,
    updated_utc        TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS recipe_ingredients (
    recipe_id   BLOB NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    item_id     BLOB NOT NULL,
    amount_bits INTEGER NOT NULL,
    position    INTEGER NOT NULL,
    PRIMARY KEY (recipe_id, item_id)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS recipe_products (
    recipe_id   BLOB NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    item_id     BLOB NOT NULL,
    amount_bits INTEGER NOT NULL,
    position    INTEGER NOT NULL,
    PRIMARY KEY (recipe_id, item_id)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS recipe_produced_in (
    recipe_id   BLOB NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    building_id BLOB NOT NULL,
    PRIMARY KEY (recipe_id, building_id)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS plans (
    id          BLOB PRIMARY KEY NOT NULL CHECK (length(id) = 16),
    slug        TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    created_utc TEXT NOT NULL,
    updated_utc TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS plan_targets (
    plan_id     BLOB NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    item_id     BLOB NOT NULL,
    amount_bits INTEGER NOT NULL,
    position    INTEGER NOT NULL,
    PRIMARY KEY (plan_id, item_id)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS plan_inputs (
    plan_id     BLOB NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    item_id     BLOB NOT NULL,
    amount_bits INTEGER NOT NULL,
    position    INTEGER NOT NULL,
    PRIMARY KEY (plan_id, item_id)
) WITHOUT ROWID;
"#;

/// Apply per-connection pragmas. Both settings are connection scoped in
/// SQLite, so every opened connection goes through here.
pub fn configure_connection(conn: &Connection, config: &StoreConfig) -> rusqlite::Result<()> {
    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}

pub fn open_connection(config: &StoreConfig) -> rusqlite::Result<Connection> {
    let conn = Connection::open(&config.database)?;
    configure_connection(&conn, config)?;
    Ok(conn)
}

/// Create missing tables and record [`SCHEMA_VERSION`].
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    let existing = read_schema_version(conn)?;
    conn.execute_batch(SCHEMA)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )?;
    match existing {
        Some(version) => info!(version, "schema already present"),
        None => info!(version = SCHEMA_VERSION, "schema created"),
    }
    Ok(())
}

/// Highest recorded schema version, or `None` on a fresh database.
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !has_table {
        return Ok(None);
    }
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
}
