//! Error types emitted by the billboard CLI.
//!
//! Keep this error type reasonably small, as every command returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use billboard_chart::{LeaderboardError, RegistryError};
use billboard_core::IdentifierError;
use billboard_gacha::{AliasError, PoolError};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the billboard CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: String,
    },
    /// An identifier option is not a valid path segment.
    #[error("invalid {field}: {source}")]
    InvalidIdentifier {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Validation failure.
        #[source]
        source: IdentifierError,
    },
    /// Listing tenant directories under the data root failed.
    #[error("failed to list tenants in {path:?}: {source}")]
    ListTenants {
        /// Data root being listed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A leaderboard operation failed.
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Loading pool definitions failed.
    #[error(transparent)]
    Pools(#[from] PoolError),
    /// Loading command aliases failed.
    #[error(transparent)]
    Aliases(#[from] AliasError),
    /// The named pool does not exist.
    #[error("no gacha pool named {pool:?}")]
    UnknownPool {
        /// Requested pool name.
        pool: String,
    },
    /// Building the async runtime or waiting for a signal failed.
    #[error("async runtime failed: {0}")]
    Runtime(#[source] std::io::Error),
    /// The recompute scheduler task panicked or was aborted.
    #[error("recompute scheduler failed: {0}")]
    Scheduler(#[source] tokio::task::JoinError),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
