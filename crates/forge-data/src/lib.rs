pub mod catalog;
pub mod loader;
pub mod schema;
pub mod starter;

pub use catalog::{Catalog, CatalogBuilder, load_catalog};
pub use loader::DataLoadError;
pub use starter::{STARTER_MARKER_SLUG, starter_catalog};
