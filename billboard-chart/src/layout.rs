//! On-disk layout of a leaderboard.

use camino::{Utf8Path, Utf8PathBuf};

use billboard_core::{BoardName, TenantId};

const BOARD_SEGMENT: &str = "billboard";
const INFO_FILE: &str = "info.json";
const ITEMS_SEGMENT: &str = "items";
const SNAPSHOTS_SEGMENT: &str = "snapshots";
const LATEST_SEGMENT: &str = "latest";
const STAGING_SEGMENT: &str = ".staging";

/// Paths used by one leaderboard under a data root.
///
/// ```text
/// <root>/<tenant>/billboard/<board>/info.json
/// <root>/<tenant>/billboard/<board>/items/<id>.json
/// <root>/<tenant>/billboard/<board>/snapshots/latest/
/// <root>/<tenant>/billboard/<board>/snapshots/<stamp>[_n]/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    tenant_root: Utf8PathBuf,
    board_dir: Utf8PathBuf,
}

impl BoardLayout {
    /// Resolve the layout for `tenant`/`name` under `data_root`.
    #[must_use]
    pub fn new(data_root: &Utf8Path, tenant: &TenantId, name: &BoardName) -> Self {
        let tenant_root = data_root.join(tenant.as_str());
        let board_dir = tenant_root.join(BOARD_SEGMENT).join(name.as_str());
        Self {
            tenant_root,
            board_dir,
        }
    }

    /// Tenant directory; must exist before a board can be opened.
    #[must_use]
    pub fn tenant_root(&self) -> &Utf8Path {
        &self.tenant_root
    }

    /// Board directory.
    #[must_use]
    pub fn board_dir(&self) -> &Utf8Path {
        &self.board_dir
    }

    /// Live metadata record.
    #[must_use]
    pub fn info_path(&self) -> Utf8PathBuf {
        self.board_dir.join(INFO_FILE)
    }

    /// Live item records.
    #[must_use]
    pub fn items_dir(&self) -> Utf8PathBuf {
        self.board_dir.join(ITEMS_SEGMENT)
    }

    /// Parent of every snapshot directory.
    #[must_use]
    pub fn snapshots_dir(&self) -> Utf8PathBuf {
        self.board_dir.join(SNAPSHOTS_SEGMENT)
    }

    /// Currently published snapshot.
    #[must_use]
    pub fn latest_dir(&self) -> Utf8PathBuf {
        self.snapshots_dir().join(LATEST_SEGMENT)
    }

    /// Scratch directory used while publishing.
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.snapshots_dir().join(STAGING_SEGMENT)
    }

    /// Directory of the archive called `name`.
    #[must_use]
    pub fn archive_dir(&self, name: &str) -> Utf8PathBuf {
        self.snapshots_dir().join(name)
    }

    /// Name reserved for the published snapshot.
    #[must_use]
    pub const fn latest_name() -> &'static str {
        LATEST_SEGMENT
    }
}

/// Metadata path inside a snapshot directory.
pub(crate) fn snapshot_info_path(dir: &Utf8Path) -> Utf8PathBuf {
    dir.join(INFO_FILE)
}

/// Item directory inside a snapshot directory.
pub(crate) fn snapshot_items_dir(dir: &Utf8Path) -> Utf8PathBuf {
    dir.join(ITEMS_SEGMENT)
}
