//! Weighted random draws and command remapping.
//!
//! A [`PoolRegistry`] holds named [`WeightedPool`] values loaded from a JSON
//! source of the form `{pool: {outcome: weight}}`. Drawing picks an outcome
//! with probability proportional to its weight. [`CommandRemapper`] combines
//! an optional [`AliasTable`] with an optional registry to turn a user
//! command into the command that should actually run.

#![forbid(unsafe_code)]

mod alias;
mod error;
mod pool;
mod rates;
mod registry;
mod remap;

pub use alias::AliasTable;
pub use error::{AliasError, PoolError};
pub use pool::{Outcome, WeightedPool};
pub use rates::{Rate, RateTable};
pub use registry::{PoolRegistry, PoolSource};
pub use remap::{CommandRemapper, DRAW_TRIGGER, RATES_COMMAND, RemappedCommand};
