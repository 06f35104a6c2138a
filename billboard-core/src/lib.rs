//! Core domain types for the billboard engine.
//!
//! A tenant's chart data is a set of [`Item`] records, one per requested
//! entity, kept in an [`ItemStore`]. Recomputation ranks those records with a
//! [`RankedSet`]. Identifiers double as on-disk path segments, so their
//! constructors validate input and return `Result`.

#![forbid(unsafe_code)]

pub mod clock;
mod ids;
mod item;
mod ranked;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, SystemClock};
pub use ids::{BoardName, IdentifierError, ItemId, TenantId};
pub use item::{Item, ItemInfo, Movement};
pub use ranked::RankedSet;
pub use store::{FileItemStore, ItemStore, ItemStoreError};
