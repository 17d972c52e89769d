//! SQLite persistence for the Forge catalog.
//!
//! [`Store`] owns one connection. Identity columns hold the storage-order
//! form of each id (see [`forge_core::codec`]), audit stamps are applied on
//! the save path, and every load goes back through the domain factories.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod persist;
pub mod query;
pub mod seed;
pub mod store;

pub use config::{SeedSource, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use store::{CatalogCounts, ChangeSet, Store};
