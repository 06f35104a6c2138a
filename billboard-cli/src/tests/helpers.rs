//! Test helpers for temporary data roots and captured command output.

use std::sync::Arc;

use billboard_core::Clock;
use billboard_core::test_support::ManualClock;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

/// A data root holding one tenant directory per name, plus a fixed clock.
pub(super) struct DataRoot {
    _dir: TempDir,
    root: Utf8PathBuf,
    clock: ManualClock,
}

impl DataRoot {
    pub(super) fn with_tenants(tenants: &[&str]) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 root");
        for tenant in tenants {
            billboard_fs::ensure_dir(&root.join(tenant)).expect("tenant dir");
        }
        let start = Utc
            .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
            .single()
            .expect("valid start");
        Self {
            _dir: dir,
            root,
            clock: ManualClock::new(start),
        }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) const fn manual_clock(&self) -> &ManualClock {
        &self.clock
    }

    pub(super) fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(self.clock.clone())
    }
}

/// Run `command` against an in-memory writer and return what it printed.
pub(super) fn capture<F>(command: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), crate::CliError>,
{
    let mut out = Vec::new();
    command(&mut out).expect("command should succeed");
    String::from_utf8(out).expect("utf-8 output")
}

/// Write `contents` to `path`, creating parent directories.
pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    billboard_fs::write_atomic(path, contents.as_bytes()).expect("write test file");
}
