//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match billboard_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("billboard: {err}");
            ExitCode::FAILURE
        }
    }
}
