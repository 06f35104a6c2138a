//! Immutable, published copies of a leaderboard.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};

use billboard_core::{BoardName, FileItemStore, Item, ItemInfo, ItemStore, TenantId};

use crate::layout::{snapshot_info_path, snapshot_items_dir};
use crate::{BoardMetadata, ChartView, LeaderboardConfig, LeaderboardError, QueueOutcome};

/// Read-only view of a leaderboard at one recompute.
///
/// The ranking is loaded eagerly and never changes, so a snapshot can be
/// shared across threads and read while the live board recomputes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    config: LeaderboardConfig,
    metadata: BoardMetadata,
    top: Vec<Item>,
    dir: Utf8PathBuf,
}

impl Snapshot {
    /// Load the snapshot stored in `dir`.
    pub fn load(dir: &Utf8Path, config: LeaderboardConfig) -> Result<Self, LeaderboardError> {
        let info_path = snapshot_info_path(dir);
        let metadata = BoardMetadata::load(&info_path)?
            .ok_or_else(|| LeaderboardError::MissingSnapshot { path: dir.to_owned() })?;
        let store = FileItemStore::open(snapshot_items_dir(dir))?;
        let mut top = Vec::with_capacity(metadata.ordered_item_ids.len());
        for id in metadata.ordered_item_ids.iter().take(config.display_size) {
            top.push(store.get_or_create(id, None)?);
        }
        Ok(Self {
            config,
            metadata,
            top,
            dir: dir.to_owned(),
        })
    }

    /// Directory the snapshot was loaded from.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Metadata captured with the snapshot.
    #[must_use]
    pub const fn metadata(&self) -> &BoardMetadata {
        &self.metadata
    }

    /// The full charted list, best first.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.top
    }
}

impl ChartView for Snapshot {
    fn tenant_id(&self) -> &TenantId {
        &self.config.tenant
    }

    fn name(&self) -> &BoardName {
        &self.config.name
    }

    fn display_size(&self) -> usize {
        self.config.display_size
    }

    fn recompute_interval_days(&self) -> u32 {
        self.config.recompute_interval_days
    }

    fn last_recomputed_at(&self) -> DateTime<Utc> {
        self.metadata.last_recomputed_at
    }

    fn top_items(&self, n: usize) -> Result<Vec<Item>, LeaderboardError> {
        Ok(self.top.iter().take(n).cloned().collect())
    }

    fn queue(&self, info: &ItemInfo) -> Result<QueueOutcome, LeaderboardError> {
        log::warn!(
            "attempted to queue {} on snapshot {}/{} at {}",
            info.id,
            self.config.tenant,
            self.config.name,
            self.dir
        );
        Ok(QueueOutcome::Rejected)
    }
}
