//! Writing, publishing and retiring snapshot directories.
//!
//! Every snapshot is written into `snapshots/.staging` first and then renamed
//! into place, so a half-written copy is never visible under its final name.
//! Archive names come from the snapshot's recompute timestamp; a `_1`, `_2`,
//! ... suffix is appended when that name is already taken.

use camino::{Utf8Path, Utf8PathBuf};

use billboard_core::clock::format_timestamp;
use billboard_core::{FileItemStore, ItemStore};

use crate::layout::{snapshot_info_path, snapshot_items_dir};
use crate::{BoardCapture, BoardLayout, BoardMetadata, Leaderboard, LeaderboardError, Snapshot};

/// Creates and manages snapshot directories for live leaderboards.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotArchiver;

impl SnapshotArchiver {
    /// Create an archiver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write an immutable copy of `live` under a timestamp-derived name.
    pub fn archive(&self, live: &Leaderboard) -> Result<Snapshot, LeaderboardError> {
        let layout = live.layout();
        let capture = live.capture()?;
        let staging = layout.staging_dir();
        stage(&staging, &capture)?;
        let target = free_archive_dir(layout, &capture.metadata)?;
        move_dir(&staging, &target)?;
        log::debug!("archived {}/{} to {target}", live.config().tenant, live.config().name);
        Snapshot::load(&target, live.config().clone())
    }

    /// Install `capture` as the published `snapshots/latest` of `live`.
    ///
    /// An existing published snapshot is retired to its archive name first.
    pub fn publish(
        &self,
        live: &Leaderboard,
        capture: &BoardCapture,
    ) -> Result<Snapshot, LeaderboardError> {
        let layout = live.layout();
        let staging = layout.staging_dir();
        stage(&staging, capture)?;
        let latest = layout.latest_dir();
        if dir_exists(&latest)? {
            let previous = Snapshot::load(&latest, live.config().clone())?;
            self.retire(&previous)?;
        }
        move_dir(&staging, &latest)?;
        log::debug!("published {}/{}", live.config().tenant, live.config().name);
        Snapshot::load(&latest, live.config().clone())
    }

    /// Move a published snapshot to its archive name and return the new path.
    ///
    /// Snapshots that are already archived stay where they are.
    pub fn retire(&self, snapshot: &Snapshot) -> Result<Utf8PathBuf, LeaderboardError> {
        let dir = snapshot.dir();
        if dir.file_name() != Some(BoardLayout::latest_name()) {
            return Ok(dir.to_owned());
        }
        let target = free_name_in(
            parent_of(dir),
            &format_timestamp(snapshot.metadata().last_recomputed_at),
        )?;
        move_dir(dir, &target)?;
        log::debug!("retired {dir} to {target}");
        Ok(target)
    }

    /// Names of archived snapshots for `live`, in ascending order.
    pub fn list_archives(&self, live: &Leaderboard) -> Result<Vec<String>, LeaderboardError> {
        let snapshots_dir = live.layout().snapshots_dir();
        if !dir_exists(&snapshots_dir)? {
            return Ok(Vec::new());
        }
        let names = billboard_fs::list_dir_names(&snapshots_dir).map_err(|source| {
            LeaderboardError::Snapshot {
                path: snapshots_dir.clone(),
                source,
            }
        })?;
        Ok(names
            .into_iter()
            .filter(|name| name != BoardLayout::latest_name())
            .collect())
    }

    /// Load the archived snapshot called `name`.
    pub fn open_archive(
        &self,
        live: &Leaderboard,
        name: &str,
    ) -> Result<Snapshot, LeaderboardError> {
        if !self.list_archives(live)?.iter().any(|known| known == name) {
            return Err(LeaderboardError::UnknownArchive {
                name: name.to_owned(),
                path: live.layout().snapshots_dir(),
            });
        }
        Snapshot::load(&live.layout().archive_dir(name), live.config().clone())
    }
}

fn stage(staging: &Utf8Path, capture: &BoardCapture) -> Result<(), LeaderboardError> {
    billboard_fs::remove_dir_all_if_exists(staging).map_err(|source| LeaderboardError::Snapshot {
        path: staging.to_owned(),
        source,
    })?;
    let store = FileItemStore::open(snapshot_items_dir(staging))?;
    for item in &capture.items {
        store.persist(item)?;
    }
    capture.metadata.save(&snapshot_info_path(staging))
}

fn free_archive_dir(
    layout: &BoardLayout,
    metadata: &BoardMetadata,
) -> Result<Utf8PathBuf, LeaderboardError> {
    free_name_in(
        &layout.snapshots_dir(),
        &format_timestamp(metadata.last_recomputed_at),
    )
}

fn free_name_in(snapshots_dir: &Utf8Path, stamp: &str) -> Result<Utf8PathBuf, LeaderboardError> {
    let base = snapshots_dir.join(stamp);
    if !dir_exists(&base)? {
        return Ok(base);
    }
    let mut suffix: u32 = 1;
    loop {
        let candidate = snapshots_dir.join(format!("{stamp}_{suffix}"));
        if !dir_exists(&candidate)? {
            return Ok(candidate);
        }
        suffix = suffix.saturating_add(1);
    }
}

fn parent_of(dir: &Utf8Path) -> &Utf8Path {
    dir.parent().unwrap_or_else(|| Utf8Path::new("."))
}

fn dir_exists(path: &Utf8Path) -> Result<bool, LeaderboardError> {
    billboard_fs::dir_exists(path).map_err(|source| LeaderboardError::Snapshot {
        path: path.to_owned(),
        source,
    })
}

fn move_dir(from: &Utf8Path, to: &Utf8Path) -> Result<(), LeaderboardError> {
    billboard_fs::rename_path(from, to).map_err(|source| LeaderboardError::Snapshot {
        path: from.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use billboard_core::test_support::ManualClock;
    use billboard_core::{BoardName, ItemId, ItemInfo, TenantId};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use crate::{ChartView, LeaderboardConfig, QueueOutcome, RecomputeOutcome};

    struct Harness {
        _dir: TempDir,
        board: Leaderboard,
    }

    #[fixture]
    fn harness() -> Harness {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
        billboard_fs::ensure_dir(&root.join("G1")).expect("tenant root");
        let start = Utc
            .with_ymd_and_hms(2024, 5, 6, 7, 8, 9)
            .single()
            .expect("valid start");
        let config = LeaderboardConfig::new(
            TenantId::new("G1").expect("tenant"),
            BoardName::new("cumulative").expect("name"),
            3,
            0,
        );
        let board =
            Leaderboard::open(&root, config, Arc::new(ManualClock::new(start))).expect("open");
        Harness { _dir: dir, board }
    }

    fn publish(archiver: SnapshotArchiver, board: &Leaderboard) -> Snapshot {
        let capture = board.capture().expect("capture");
        archiver.publish(board, &capture).expect("publish")
    }

    fn queue(board: &Leaderboard, id: &str) {
        board
            .record(&ItemInfo::new(ItemId::new(id).expect("id"), None))
            .expect("queue");
    }

    #[rstest]
    fn archive_names_collide_with_numeric_suffixes(harness: Harness) {
        queue(&harness.board, "a");
        harness.board.force_recompute().expect("recompute");
        let archiver = SnapshotArchiver::new();

        let first = archiver.archive(&harness.board).expect("first");
        let second = archiver.archive(&harness.board).expect("second");
        let third = archiver.archive(&harness.board).expect("third");

        assert_eq!(first.dir().file_name(), Some("20240506070809"));
        assert_eq!(second.dir().file_name(), Some("20240506070809_1"));
        assert_eq!(third.dir().file_name(), Some("20240506070809_2"));
        assert_eq!(
            archiver.list_archives(&harness.board).expect("list"),
            vec!["20240506070809", "20240506070809_1", "20240506070809_2"]
        );
    }

    #[rstest]
    fn archived_snapshot_is_unaffected_by_later_requests(harness: Harness) {
        queue(&harness.board, "a");
        harness.board.force_recompute().expect("recompute");
        let archiver = SnapshotArchiver::new();
        let snapshot = archiver.archive(&harness.board).expect("archive");

        queue(&harness.board, "b");
        queue(&harness.board, "b");
        harness.board.force_recompute().expect("recompute again");
        let reopened = archiver
            .open_archive(&harness.board, "20240506070809")
            .expect("open archive");

        let ids: Vec<String> = reopened
            .top_items(3)
            .expect("top")
            .iter()
            .map(|item| item.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(snapshot, reopened);
    }

    #[rstest]
    fn publish_retires_previous_latest(harness: Harness) {
        let archiver = SnapshotArchiver::new();
        let initial = publish(archiver, &harness.board);
        assert_eq!(initial.dir().file_name(), Some("latest"));

        queue(&harness.board, "a");
        harness.board.force_recompute().expect("recompute");
        let next = publish(archiver, &harness.board);

        assert_eq!(next.top_items(3).expect("top").len(), 1);
        assert_eq!(
            archiver.list_archives(&harness.board).expect("list"),
            vec!["19700101000000"]
        );
        assert!(!dir_exists(&harness.board.layout().staging_dir()).expect("staging gone"));
    }

    #[rstest]
    fn retire_moves_latest_once(harness: Harness) {
        let archiver = SnapshotArchiver::new();
        let published = publish(archiver, &harness.board);

        let moved = archiver.retire(&published).expect("retire");

        assert_eq!(moved.file_name(), Some("19700101000000"));
        assert!(!dir_exists(&harness.board.layout().latest_dir()).expect("latest gone"));
        let retired = Snapshot::load(&moved, harness.board.config().clone()).expect("reload");
        assert_eq!(archiver.retire(&retired).expect("no-op"), moved);
    }

    #[rstest]
    fn publish_stages_the_recomputed_capture(harness: Harness) {
        for id in ["v1", "v1", "v1", "v2", "v2"] {
            queue(&harness.board, id);
        }
        let outcome = harness.board.force_recompute().expect("recompute");
        for _ in 0..5 {
            queue(&harness.board, "v2");
        }
        let RecomputeOutcome::Performed { capture, .. } = outcome else {
            panic!("forced recompute always runs");
        };

        let snapshot = SnapshotArchiver::new()
            .publish(&harness.board, &capture)
            .expect("publish");

        let counts: Vec<(String, u64)> = snapshot
            .items()
            .iter()
            .map(|item| (item.id().to_string(), item.times_requested()))
            .collect();
        assert_eq!(counts, vec![("v1".to_owned(), 3), ("v2".to_owned(), 2)]);
        assert_eq!(snapshot.metadata(), &capture.metadata);
    }

    #[rstest]
    fn snapshot_rejects_queue(harness: Harness) {
        queue(&harness.board, "a");
        harness.board.force_recompute().expect("recompute");
        let snapshot = publish(SnapshotArchiver::new(), &harness.board);
        let before = snapshot.top_items(3).expect("before");

        let info = ItemInfo::new(ItemId::new("a").expect("id"), None);
        for _ in 0..3 {
            assert_eq!(snapshot.queue(&info).expect("queue"), QueueOutcome::Rejected);
        }

        assert_eq!(snapshot.top_items(3).expect("after"), before);
    }

    #[rstest]
    fn unknown_archive_is_reported(harness: Harness) {
        let err = SnapshotArchiver::new()
            .open_archive(&harness.board, "latest")
            .expect_err("latest is not an archive");
        assert!(matches!(err, LeaderboardError::UnknownArchive { .. }));
    }
}
