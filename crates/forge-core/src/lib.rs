//! Forge Core -- the domain model of a production-planning catalog.
//!
//! Items, buildings, recipes and plans for factory and crafting economies,
//! together with the identifier codec used at the storage boundary. Every
//! operation here is pure and synchronous: no I/O, no logging, no locks.
//!
//! # Aggregates
//!
//! - [`item::Item`] -- something produced or gathered, with a unit kind.
//! - [`building::Building`] -- a kind of production facility.
//! - [`recipe::Recipe`] -- ingredients to products over one cycle, runnable
//!   in a set of buildings.
//! - [`plan::Plan`] -- desired outputs and available inputs.
//!
//! Aggregates refer to each other only through typed ids ([`id::Id`]), so
//! each one can be loaded, validated and saved on its own.
//!
//! # Mutation Protocol
//!
//! Factories (`create`) and mutators run the same guards ([`guard`]) and
//! either succeed completely or return a [`error::DomainError`] with the
//! aggregate untouched. Line collections are consolidated (one line per item,
//! amounts summed) and replacing them with an equivalent set is a no-op:
//!
//! ```rust,ignore
//! let changed = recipe.replace_products([RecipeLine::new(ingot, one)])?;
//! assert!(!changed);
//! ```
//!
//! # Storage Boundary
//!
//! - [`codec`] -- reversible permutation of UUIDv7 bytes into an index
//!   friendly order.
//! - [`audit`] -- created/updated stamps, applied by the save path through
//!   [`audit::stamp`] with an explicit [`audit::SaveState`].

pub mod audit;
pub mod building;
pub mod codec;
pub mod error;
pub mod fixed;
pub mod guard;
pub mod id;
pub mod item;
pub mod line;
pub mod plan;
pub mod recipe;
pub mod slug;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{DomainError, DomainResult};
