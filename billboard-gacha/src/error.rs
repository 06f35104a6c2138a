use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading pool definitions.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Neither the primary source nor the bundled example exists.
    #[error("pool source {primary} is missing and no example exists at {example}")]
    MissingSource {
        /// Expected primary source.
        primary: Utf8PathBuf,
        /// Bundled example that would have been copied.
        example: Utf8PathBuf,
    },
    /// Copying the example over the missing primary source failed.
    #[error("failed to copy example pool source {from} to {to}: {source}")]
    Copy {
        /// Example source.
        from: Utf8PathBuf,
        /// Primary source being created.
        to: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the source failed.
    #[error("failed to read pool source {path}: {source}")]
    Read {
        /// Source location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The source is not valid JSON.
    #[error("failed to parse pool source {path}: {source}")]
    Decode {
        /// Source location.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The source is valid JSON but not an object of pools.
    #[error("pool source {path} must be a JSON object of pools")]
    NotAnObject {
        /// Source location.
        path: Utf8PathBuf,
    },
}

/// Errors raised while loading command aliases.
#[derive(Debug, Error)]
pub enum AliasError {
    /// Reading the alias file failed.
    #[error("failed to read alias file {path}: {source}")]
    Read {
        /// File location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The alias file is not valid JSON.
    #[error("failed to parse alias file {path}: {source}")]
    Decode {
        /// File location.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The alias file is valid JSON but not an object of commands.
    #[error("alias file {path} must be a JSON object of commands")]
    NotAnObject {
        /// File location.
        path: Utf8PathBuf,
    },
}
