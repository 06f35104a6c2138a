//! Process-wide directory of leaderboards and their published snapshots.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::{Mutex, RwLock};

use billboard_core::{BoardName, Clock, Item, ItemInfo, TenantId};

use crate::{
    BoardCapture, ChartView, Leaderboard, LeaderboardConfig, LeaderboardError, RecomputeOutcome,
    RegistryError, Snapshot, SnapshotArchiver,
};

type BoardKey = (TenantId, BoardName);

struct Entry {
    live: Leaderboard,
    published: ArcSwap<Snapshot>,
    /// Recomputed state not yet installed as `published`. Holding this lock
    /// also serialises publishing for the board.
    pending: Mutex<Option<BoardCapture>>,
}

impl Entry {
    fn is_stale(&self) -> bool {
        self.published.load().last_recomputed_at() != self.live.metadata().last_recomputed_at
    }

    /// Publish the pending capture, or a fresh one when the published
    /// snapshot lags the live metadata. Returns whether anything was published.
    ///
    /// A capture that fails to publish stays pending for the next attempt.
    fn publish_pending(
        &self,
        pending: &mut Option<BoardCapture>,
        archiver: SnapshotArchiver,
    ) -> Result<bool, LeaderboardError> {
        let capture = match pending.take() {
            Some(capture) => capture,
            None if self.is_stale() => self.live.capture()?,
            None => return Ok(false),
        };
        match archiver.publish(&self.live, &capture) {
            Ok(snapshot) => {
                self.published.store(Arc::new(snapshot));
                Ok(true)
            }
            Err(err) => {
                *pending = Some(capture);
                Err(err)
            }
        }
    }
}

/// One board that failed during a [`LeaderboardRegistry::tick`].
#[derive(Debug)]
pub struct TickFailure {
    /// Owning tenant.
    pub tenant: TenantId,
    /// Board name.
    pub name: BoardName,
    /// What went wrong.
    pub error: LeaderboardError,
}

/// Summary of one pass over every registered board.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Boards that published a new snapshot, including ones catching up on
    /// an earlier failed publish.
    pub recomputed: Vec<(TenantId, BoardName)>,
    /// Boards that were not yet due.
    pub skipped: usize,
    /// Boards whose recompute or publish failed.
    pub failures: Vec<TickFailure>,
}

/// Directory of live leaderboards keyed by tenant and name.
///
/// Readers only ever receive published [`Snapshot`] values. A recompute
/// publishes the new state and swaps the shared pointer in one step, so a
/// reader sees either the previous ranking or the new one.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use billboard_chart::LeaderboardRegistry;
/// use billboard_core::{SystemClock, TenantId};
/// use camino::Utf8PathBuf;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
/// std::fs::create_dir(root.join("G1")).expect("tenant dir");
///
/// let registry = LeaderboardRegistry::new(root, Arc::new(SystemClock));
/// let tenant = TenantId::new("G1").expect("tenant");
/// registry.register_default(tenant.clone()).expect("register");
/// assert!(registry.get(&tenant, &"Cumulative".parse().expect("name")).is_some());
/// ```
pub struct LeaderboardRegistry {
    data_root: Utf8PathBuf,
    clock: Arc<dyn Clock>,
    archiver: SnapshotArchiver,
    boards: RwLock<BTreeMap<BoardKey, Arc<Entry>>>,
}

impl std::fmt::Debug for LeaderboardRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardRegistry")
            .field("data_root", &self.data_root)
            .field("boards", &self.boards.read().len())
            .finish_non_exhaustive()
    }
}

impl LeaderboardRegistry {
    /// Create an empty registry for boards stored under `data_root`.
    pub fn new(data_root: impl Into<Utf8PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            data_root: data_root.into(),
            clock,
            archiver: SnapshotArchiver::new(),
            boards: RwLock::new(BTreeMap::new()),
        }
    }

    /// Root directory holding every tenant.
    #[must_use]
    pub fn data_root(&self) -> &Utf8Path {
        &self.data_root
    }

    /// Open the board described by `config` using this registry's root and clock.
    pub fn open_leaderboard(
        &self,
        config: LeaderboardConfig,
    ) -> Result<Leaderboard, LeaderboardError> {
        Leaderboard::open(&self.data_root, config, Arc::clone(&self.clock))
    }

    /// Register `live`, loading or creating its published snapshot.
    ///
    /// A stored snapshot older than the live board's last recompute is
    /// replaced. A board already registered under the same tenant and name
    /// is replaced.
    pub fn register(&self, live: Leaderboard) -> Result<(), RegistryError> {
        let key = (live.config().tenant.clone(), live.config().name.clone());
        let latest = live.layout().latest_dir();
        let exists = billboard_fs::dir_exists(&latest).map_err(|source| {
            LeaderboardError::Snapshot {
                path: latest.clone(),
                source,
            }
        })?;
        let stored = if exists {
            Some(Snapshot::load(&latest, live.config().clone())?)
        } else {
            None
        };
        let snapshot = match stored {
            Some(snapshot)
                if snapshot.last_recomputed_at() == live.metadata().last_recomputed_at =>
            {
                snapshot
            }
            Some(_) => {
                log::warn!("published snapshot of {}/{} is stale; republishing", key.0, key.1);
                self.archiver.publish(&live, &live.capture()?)?
            }
            None => self.archiver.publish(&live, &live.capture()?)?,
        };
        let entry = Arc::new(Entry {
            live,
            published: ArcSwap::from_pointee(snapshot),
            pending: Mutex::new(None),
        });
        if self.boards.write().insert(key.clone(), entry).is_some() {
            log::debug!("replaced leaderboard {}/{}", key.0, key.1);
        } else {
            log::info!("registered leaderboard {}/{}", key.0, key.1);
        }
        Ok(())
    }

    /// Register the default "Cumulative" board for `tenant`.
    pub fn register_default(&self, tenant: TenantId) -> Result<(), RegistryError> {
        let config = LeaderboardConfig::cumulative(tenant)?;
        let live = self.open_leaderboard(config)?;
        self.register(live)
    }

    /// Current published snapshot for `tenant`/`name`.
    #[must_use]
    pub fn get(&self, tenant: &TenantId, name: &BoardName) -> Option<Arc<Snapshot>> {
        let found = self
            .entry(tenant, name)
            .map(|entry| entry.published.load_full());
        if found.is_none() {
            log::warn!("no leaderboard registered with tenant {tenant}, name {name}");
        }
        found
    }

    /// Count a request on the live board for `tenant`/`name`.
    pub fn queue(
        &self,
        tenant: &TenantId,
        name: &BoardName,
        info: &ItemInfo,
    ) -> Result<Item, RegistryError> {
        let entry = self.require(tenant, name)?;
        Ok(entry.live.record(info)?)
    }

    /// Recompute `tenant`/`name` now and publish the result.
    pub fn force_recompute(
        &self,
        tenant: &TenantId,
        name: &BoardName,
    ) -> Result<Arc<Snapshot>, RegistryError> {
        let entry = self.require(tenant, name)?;
        let mut pending = entry.pending.lock();
        if let RecomputeOutcome::Performed { capture, .. } = entry.live.force_recompute()? {
            *pending = Some(capture);
        }
        entry.publish_pending(&mut pending, self.archiver)?;
        Ok(entry.published.load_full())
    }

    /// Recompute every due board and publish the new snapshots.
    ///
    /// Boards whose earlier publish failed are published again even when
    /// they are not due. A failing board is reported and the pass continues
    /// with the rest.
    pub fn tick(&self) -> TickReport {
        let entries: Vec<(BoardKey, Arc<Entry>)> = self
            .boards
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), Arc::clone(entry)))
            .collect();
        let mut report = TickReport::default();
        for ((tenant, name), entry) in entries {
            let mut pending = entry.pending.lock();
            let outcome = entry.live.recompute_if_due().and_then(|recompute| {
                if let RecomputeOutcome::Performed { capture, .. } = recompute {
                    *pending = Some(capture);
                }
                entry.publish_pending(&mut pending, self.archiver)
            });
            match outcome {
                Ok(true) => report.recomputed.push((tenant, name)),
                Ok(false) => report.skipped = report.skipped.saturating_add(1),
                Err(error) => {
                    log::warn!("recompute of {tenant}/{name} failed: {error}");
                    report.failures.push(TickFailure {
                        tenant,
                        name,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Registered boards in tenant, then name, order.
    #[must_use]
    pub fn boards(&self) -> Vec<(TenantId, BoardName)> {
        self.boards.read().keys().cloned().collect()
    }

    /// Archived snapshot names for `tenant`/`name`.
    pub fn list_archives(
        &self,
        tenant: &TenantId,
        name: &BoardName,
    ) -> Result<Vec<String>, RegistryError> {
        let entry = self.require(tenant, name)?;
        Ok(self.archiver.list_archives(&entry.live)?)
    }

    /// Load the archived snapshot `archive` for `tenant`/`name`.
    pub fn open_archive(
        &self,
        tenant: &TenantId,
        name: &BoardName,
        archive: &str,
    ) -> Result<Snapshot, RegistryError> {
        let entry = self.require(tenant, name)?;
        Ok(self.archiver.open_archive(&entry.live, archive)?)
    }

    fn entry(&self, tenant: &TenantId, name: &BoardName) -> Option<Arc<Entry>> {
        self.boards
            .read()
            .get(&(tenant.clone(), name.clone()))
            .map(Arc::clone)
    }

    fn require(&self, tenant: &TenantId, name: &BoardName) -> Result<Arc<Entry>, RegistryError> {
        self.entry(tenant, name)
            .ok_or_else(|| RegistryError::UnknownLeaderboard {
                tenant: tenant.clone(),
                name: name.clone(),
            })
    }
}
