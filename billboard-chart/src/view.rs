//! Read capability shared by live leaderboards and snapshots.

use chrono::{DateTime, Utc};

use billboard_core::{BoardName, Item, ItemInfo, TenantId};

use crate::LeaderboardError;

/// Result of routing a request to a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    /// The request was counted; carries the updated item.
    Recorded(Item),
    /// The chart is read-only and ignored the request.
    Rejected,
}

impl QueueOutcome {
    /// Whether the request was counted.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Operations every chart supports, whether live or archived.
pub trait ChartView {
    /// Owning tenant.
    fn tenant_id(&self) -> &TenantId;

    /// Board name.
    fn name(&self) -> &BoardName;

    /// Number of items in the top list.
    fn display_size(&self) -> usize;

    /// Days between scheduled recomputes.
    fn recompute_interval_days(&self) -> u32;

    /// When the ranking was last rebuilt.
    fn last_recomputed_at(&self) -> DateTime<Utc>;

    /// Up to `n` charted items, best first.
    fn top_items(&self, n: usize) -> Result<Vec<Item>, LeaderboardError>;

    /// Count a request for `info`, if this chart accepts writes.
    fn queue(&self, info: &ItemInfo) -> Result<QueueOutcome, LeaderboardError>;
}
