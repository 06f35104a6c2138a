//! Leaderboard configuration.

use billboard_core::{BoardName, IdentifierError, TenantId};

/// Name of the leaderboard every tenant gets by default.
pub const DEFAULT_BOARD_NAME: &str = "Cumulative";

/// Number of items shown by the default leaderboard.
pub const DEFAULT_DISPLAY_SIZE: usize = 20;

/// Recompute cadence of the default leaderboard, in days.
pub const DEFAULT_RECOMPUTE_INTERVAL_DAYS: u32 = 7;

/// Identity, size and cadence of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardConfig {
    /// Owning tenant.
    pub tenant: TenantId,
    /// Board name, unique within the tenant.
    pub name: BoardName,
    /// Number of items kept in the ranked top list.
    pub display_size: usize,
    /// Days between scheduled recomputes; zero means always due.
    pub recompute_interval_days: u32,
}

impl LeaderboardConfig {
    /// Build a configuration.
    #[must_use]
    pub const fn new(
        tenant: TenantId,
        name: BoardName,
        display_size: usize,
        recompute_interval_days: u32,
    ) -> Self {
        Self {
            tenant,
            name,
            display_size,
            recompute_interval_days,
        }
    }

    /// The default "Cumulative" board for `tenant`.
    pub fn cumulative(tenant: TenantId) -> Result<Self, IdentifierError> {
        Ok(Self::new(
            tenant,
            BoardName::new(DEFAULT_BOARD_NAME)?,
            DEFAULT_DISPLAY_SIZE,
            DEFAULT_RECOMPUTE_INTERVAL_DAYS,
        ))
    }
}
