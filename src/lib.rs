//! Facade crate for the billboard engine.
//!
//! This crate re-exports the core domain types and exposes the leaderboard
//! and gacha layers behind feature flags.

#![forbid(unsafe_code)]

pub use billboard_core::{
    BoardName, Clock, FileItemStore, IdentifierError, Item, ItemId, ItemInfo, ItemStore,
    ItemStoreError, Movement, RankedSet, SystemClock, TenantId,
};

#[cfg(feature = "test-support")]
pub use billboard_core::test_support;

#[cfg(feature = "chart")]
pub use billboard_chart::{
    ChartEntry, ChartTable, ChartView, Leaderboard, LeaderboardConfig, LeaderboardError,
    LeaderboardRegistry, QueueOutcome, RecomputeScheduler, RegistryError, SchedulerHandle,
    Snapshot, TickReport,
};

#[cfg(feature = "gacha")]
pub use billboard_gacha::{
    AliasTable, CommandRemapper, PoolRegistry, PoolSource, RateTable, RemappedCommand,
    WeightedPool,
};
