//! Leaderboards, published snapshots and scheduled recomputation.
//!
//! A [`Leaderboard`] is the live, mutable chart for one tenant and name. It
//! counts requests through an [`ItemStore`](billboard_core::ItemStore) and
//! periodically ranks them. Readers never see a live board: the
//! [`LeaderboardRegistry`] publishes immutable [`Snapshot`] values and swaps
//! them in atomically after each recompute. [`RecomputeScheduler`] drives the
//! registry from a cancellable tokio task.

#![forbid(unsafe_code)]

mod archive;
mod config;
mod error;
mod layout;
mod leaderboard;
mod metadata;
mod registry;
mod render;
mod scheduler;
mod snapshot;
mod view;

pub use archive::SnapshotArchiver;
pub use config::{
    DEFAULT_BOARD_NAME, DEFAULT_DISPLAY_SIZE, DEFAULT_RECOMPUTE_INTERVAL_DAYS, LeaderboardConfig,
};
pub use error::{LeaderboardError, RegistryError};
pub use layout::BoardLayout;
pub use leaderboard::{BoardCapture, Leaderboard, RecomputeOutcome};
pub use metadata::BoardMetadata;
pub use registry::{LeaderboardRegistry, TickFailure, TickReport};
pub use render::{ChartEntry, ChartTable};
pub use scheduler::{DEFAULT_TICK_PERIOD, RecomputeScheduler, SchedulerHandle};
pub use snapshot::Snapshot;
pub use view::{ChartView, QueueOutcome};
