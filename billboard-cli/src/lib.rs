//! Command-line interface for the billboard engine.
#![forbid(unsafe_code)]

use std::io::Write;
use std::sync::Arc;

use billboard_core::{Clock, SystemClock};
use clap::{Parser, Subcommand};

mod board;
mod error;
mod gacha;

pub use error::CliError;

use board::{HistoryArgs, QueueArgs, ServeArgs, ShowArgs, TickArgs};
use gacha::{DrawArgs, RatesArgs, RemapArgs};

const ENV_PREFIX: &str = "BILLBOARD";

pub(crate) const ARG_DATA_ROOT: &str = "data-root";
pub(crate) const ARG_TENANT: &str = "tenant";
pub(crate) const ARG_BOARD: &str = "board";
pub(crate) const ARG_ITEM: &str = "item";
pub(crate) const ARG_POOL: &str = "pool";
pub(crate) const ARG_COMMAND: &str = "command";

/// Run the billboard CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, Arc::new(SystemClock), &mut stdout)
}

fn dispatch(command: Command, clock: Arc<dyn Clock>, out: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Queue(args) => board::run_queue(args, clock, out),
        Command::Show(args) => board::run_show(args, clock, out),
        Command::Tick(args) => board::run_tick(args, clock, out),
        Command::Serve(args) => board::run_serve(args, clock, out),
        Command::History(args) => board::run_history(args, clock, out),
        Command::Draw(args) => gacha::run_draw(args, out),
        Command::Rates(args) => gacha::run_rates(args, out),
        Command::Remap(args) => gacha::run_remap(args, out),
    }
}

/// Environment variable consulted for `field` of subcommand `command`.
pub(crate) fn env_var(command: &str, field: &str) -> String {
    format!(
        "{ENV_PREFIX}_CMDS_{}_{}",
        command.to_ascii_uppercase(),
        field.replace('-', "_").to_ascii_uppercase()
    )
}

pub(crate) fn missing(command: &str, field: &'static str) -> CliError {
    CliError::MissingArgument {
        field,
        env: env_var(command, field),
    }
}

pub(crate) fn write_line(out: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(out, "{line}").map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "billboard",
    about = "Request leaderboards and weighted command draws",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Count one request for an item.
    Queue(QueueArgs),
    /// Print a published or archived chart.
    Show(ShowArgs),
    /// Recompute due leaderboards once and publish the results.
    Tick(TickArgs),
    /// Recompute leaderboards on a schedule until interrupted.
    Serve(ServeArgs),
    /// List archived snapshots of a leaderboard.
    History(HistoryArgs),
    /// Draw one outcome from a gacha pool.
    Draw(DrawArgs),
    /// Print the odds of a gacha pool.
    Rates(RatesArgs),
    /// Apply aliases and gacha draws to a command line.
    Remap(RemapArgs),
}

#[cfg(test)]
mod tests;
