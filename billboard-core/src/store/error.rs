use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing item records.
#[derive(Debug, Error)]
pub enum ItemStoreError {
    /// Creating the storage directory failed.
    #[error("failed to create item directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading a record failed.
    #[error("failed to read item record {path}: {source}")]
    Read {
        /// Record location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A record exists but is not valid JSON for an item.
    #[error("failed to decode item record {path}: {source}")]
    Decode {
        /// Record location.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Serialising a record failed.
    #[error("failed to encode item record for {path}: {source}")]
    Encode {
        /// Intended record location.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Writing a record failed.
    #[error("failed to write item record {path}: {source}")]
    Write {
        /// Record location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Listing the storage directory failed.
    #[error("failed to list item records in {path}: {source}")]
    List {
        /// Directory being listed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
