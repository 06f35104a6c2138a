//! Error types for leaderboards and the registry.

use camino::Utf8PathBuf;
use thiserror::Error;

use billboard_core::{BoardName, IdentifierError, ItemStoreError, TenantId};

/// Errors raised by a leaderboard, its snapshots and the archiver.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The tenant's data directory does not exist.
    #[error("unable to proceed: cannot find tenant directory {path}")]
    MissingTenantRoot {
        /// Expected tenant directory.
        path: Utf8PathBuf,
    },
    /// Checking the tenant directory failed.
    #[error("failed to inspect tenant directory {path}: {source}")]
    InspectTenantRoot {
        /// Tenant directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A board or snapshot directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading `info.json` failed.
    #[error("failed to read leaderboard metadata {path}: {source}")]
    ReadMetadata {
        /// Metadata location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `info.json` is not valid metadata.
    #[error("failed to decode leaderboard metadata {path}: {source}")]
    DecodeMetadata {
        /// Metadata location.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Serialising metadata failed.
    #[error("failed to encode leaderboard metadata for {path}: {source}")]
    EncodeMetadata {
        /// Intended metadata location.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Writing `info.json` failed.
    #[error("failed to write leaderboard metadata {path}: {source}")]
    WriteMetadata {
        /// Metadata location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing an item record failed.
    #[error(transparent)]
    Store(#[from] ItemStoreError),
    /// Moving, listing or removing a snapshot directory failed.
    #[error("failed to update snapshot directory {path}: {source}")]
    Snapshot {
        /// Snapshot directory involved.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A snapshot directory has no `info.json`.
    #[error("snapshot directory {path} holds no leaderboard metadata")]
    MissingSnapshot {
        /// Snapshot directory.
        path: Utf8PathBuf,
    },
    /// No archived snapshot has the requested name.
    #[error("no archived snapshot named `{name}` in {path}")]
    UnknownArchive {
        /// Requested archive name.
        name: String,
        /// Snapshot directory searched.
        path: Utf8PathBuf,
    },
}

/// Errors raised by [`LeaderboardRegistry`](crate::LeaderboardRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No leaderboard is registered under the given tenant and name.
    #[error("no leaderboard registered with tenant `{tenant}` and name `{name}`")]
    UnknownLeaderboard {
        /// Requested tenant.
        tenant: TenantId,
        /// Requested board name.
        name: BoardName,
    },
    /// A board name or tenant id was invalid.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    /// The leaderboard operation failed.
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
}
