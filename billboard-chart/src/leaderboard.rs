//! Live leaderboard: request counting and periodic ranking.

use std::sync::Arc;

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use billboard_core::clock::truncate_to_seconds;
use billboard_core::{
    BoardName, Clock, FileItemStore, Item, ItemId, ItemInfo, ItemStore, RankedSet, TenantId,
};

use crate::{BoardLayout, BoardMetadata, ChartView, LeaderboardConfig, LeaderboardError, QueueOutcome};

/// Whether a recompute ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// The ranking was rebuilt.
    Performed {
        /// Ids written to the top list, best first.
        charted: Vec<ItemId>,
        /// Board state taken under the same lock as the recompute.
        capture: BoardCapture,
    },
    /// The interval has not elapsed since the last recompute.
    NotDue,
}

impl RecomputeOutcome {
    /// Whether the ranking was rebuilt.
    #[must_use]
    pub const fn performed(&self) -> bool {
        matches!(self, Self::Performed { .. })
    }
}

/// Consistent copy of a board's metadata and every item record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCapture {
    /// Metadata at capture time.
    pub metadata: BoardMetadata,
    /// Every stored item, in id order.
    pub items: Vec<Item>,
}

#[derive(Debug, Default)]
struct BoardState {
    metadata: BoardMetadata,
    cache: Vec<Item>,
}

/// The mutable chart for one tenant and board name.
///
/// Requests and recomputes serialise on an internal lock, so a recompute
/// always reads the latest persisted counters and never loses an increment.
pub struct Leaderboard {
    config: LeaderboardConfig,
    layout: BoardLayout,
    store: Arc<dyn ItemStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<BoardState>,
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaderboard")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Leaderboard {
    /// Open the board described by `config` under `data_root`.
    ///
    /// The tenant directory must already exist. Board directories and a
    /// default `info.json` are created when missing.
    pub fn open(
        data_root: &Utf8Path,
        config: LeaderboardConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LeaderboardError> {
        let layout = BoardLayout::new(data_root, &config.tenant, &config.name);
        ensure_tenant_root(&layout)?;
        let store = FileItemStore::open(layout.items_dir())?;
        Self::from_parts(layout, config, Arc::new(store), clock)
    }

    /// Open a board whose items live in `store` rather than its items directory.
    pub fn open_with_store(
        layout: BoardLayout,
        config: LeaderboardConfig,
        store: Arc<dyn ItemStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LeaderboardError> {
        ensure_tenant_root(&layout)?;
        Self::from_parts(layout, config, store, clock)
    }

    /// Shared tail of both constructors; the tenant root is already checked.
    fn from_parts(
        layout: BoardLayout,
        config: LeaderboardConfig,
        store: Arc<dyn ItemStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LeaderboardError> {
        billboard_fs::ensure_dir(layout.board_dir()).map_err(|source| {
            LeaderboardError::CreateDir {
                path: layout.board_dir().to_owned(),
                source,
            }
        })?;
        let info_path = layout.info_path();
        let metadata = if let Some(existing) = BoardMetadata::load(&info_path)? {
            existing
        } else {
            let fresh = BoardMetadata::default();
            fresh.save(&info_path)?;
            fresh
        };
        log::debug!(
            "opened leaderboard {}/{} last recomputed {}",
            config.tenant,
            config.name,
            metadata.last_recomputed_at
        );
        Ok(Self {
            config,
            layout,
            store,
            clock,
            state: Mutex::new(BoardState {
                metadata,
                cache: Vec::new(),
            }),
        })
    }

    /// Count one request for `info` and persist it immediately.
    ///
    /// The cached top list is dropped; it reloads on the next read.
    pub fn record(&self, info: &ItemInfo) -> Result<Item, LeaderboardError> {
        let mut state = self.state.lock();
        let mut item = self.store.get_or_create(&info.id, info.title.as_deref())?;
        item.record_request();
        self.store.persist(&item)?;
        state.cache.clear();
        log::debug!(
            "queued {} on {}/{} ({} requests)",
            item.id(),
            self.config.tenant,
            self.config.name,
            item.times_requested()
        );
        Ok(item)
    }

    /// Whether a scheduled recompute would run now.
    #[must_use]
    pub fn is_due(&self) -> bool {
        let last = self.state.lock().metadata.last_recomputed_at;
        self.is_due_at(last, self.clock.now())
    }

    /// Rebuild the ranking if the recompute interval has elapsed.
    pub fn recompute_if_due(&self) -> Result<RecomputeOutcome, LeaderboardError> {
        let mut state = self.state.lock();
        let now = self.clock.now();
        if !self.is_due_at(state.metadata.last_recomputed_at, now) {
            log::debug!(
                "{}/{} not due; last recomputed {}",
                self.config.tenant,
                self.config.name,
                state.metadata.last_recomputed_at
            );
            return Ok(RecomputeOutcome::NotDue);
        }
        self.recompute_locked(&mut state, now)
    }

    /// Rebuild the ranking regardless of the interval.
    pub fn force_recompute(&self) -> Result<RecomputeOutcome, LeaderboardError> {
        let mut state = self.state.lock();
        let now = self.clock.now();
        self.recompute_locked(&mut state, now)
    }

    /// Copy metadata and every item record under the board lock.
    pub fn capture(&self) -> Result<BoardCapture, LeaderboardError> {
        let state = self.state.lock();
        let items = self.store.list_all()?;
        Ok(BoardCapture {
            metadata: state.metadata.clone(),
            items,
        })
    }

    /// Configuration the board was opened with.
    #[must_use]
    pub const fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    /// Resolved on-disk layout.
    #[must_use]
    pub const fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Copy of the current metadata.
    #[must_use]
    pub fn metadata(&self) -> BoardMetadata {
        self.state.lock().metadata.clone()
    }

    fn is_due_at(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let elapsed_days = now.signed_duration_since(last).num_days();
        elapsed_days >= i64::from(self.config.recompute_interval_days)
    }

    fn recompute_locked(
        &self,
        state: &mut BoardState,
        now: DateTime<Utc>,
    ) -> Result<RecomputeOutcome, LeaderboardError> {
        let ranked = RankedSet::from_items(self.store.list_all()?);
        let mut top = ranked.into_top_k(self.config.display_size);
        for (index, item) in top.iter_mut().enumerate() {
            let position = u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1));
            item.record_chart_position(position);
            self.store.persist(item)?;
        }
        let charted: Vec<ItemId> = top.iter().map(|item| item.id().clone()).collect();
        let metadata = BoardMetadata {
            last_recomputed_at: truncate_to_seconds(now),
            ordered_item_ids: charted.clone(),
        };
        metadata.save(&self.layout.info_path())?;
        let capture = BoardCapture {
            metadata: metadata.clone(),
            items: self.store.list_all()?,
        };
        state.metadata = metadata;
        state.cache = top;
        log::info!(
            "recomputed {}/{}: {} items charted",
            self.config.tenant,
            self.config.name,
            charted.len()
        );
        Ok(RecomputeOutcome::Performed { charted, capture })
    }

    fn load_cache(&self, state: &mut BoardState) -> Result<(), LeaderboardError> {
        if !state.cache.is_empty() {
            return Ok(());
        }
        let mut cache = Vec::with_capacity(state.metadata.ordered_item_ids.len());
        for id in state
            .metadata
            .ordered_item_ids
            .iter()
            .take(self.config.display_size)
        {
            cache.push(self.store.get_or_create(id, None)?);
        }
        state.cache = cache;
        Ok(())
    }
}

impl ChartView for Leaderboard {
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
        self.state.lock().metadata.last_recomputed_at
    }

    fn top_items(&self, n: usize) -> Result<Vec<Item>, LeaderboardError> {
        let mut state = self.state.lock();
        self.load_cache(&mut state)?;
        Ok(state.cache.iter().take(n).cloned().collect())
    }

    fn queue(&self, info: &ItemInfo) -> Result<QueueOutcome, LeaderboardError> {
        self.record(info).map(QueueOutcome::Recorded)
    }
}

fn ensure_tenant_root(layout: &BoardLayout) -> Result<(), LeaderboardError> {
    let root = layout.tenant_root();
    match billboard_fs::dir_exists(root) {
        Ok(true) => Ok(()),
        Ok(false) => Err(LeaderboardError::MissingTenantRoot {
            path: root.to_owned(),
        }),
        Err(source) => Err(LeaderboardError::InspectTenantRoot {
            path: root.to_owned(),
            source,
        }),
    }
}
