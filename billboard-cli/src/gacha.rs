//! Gacha subcommands: `draw`, `rates` and `remap`.

use std::io::Write;

use billboard_gacha::{
    AliasTable, CommandRemapper, PoolRegistry, PoolSource, RATES_COMMAND, RemappedCommand,
};
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{ARG_COMMAND, ARG_POOL, CliError, missing, write_line};

const CMD_DRAW: &str = "draw";
const CMD_RATES: &str = "rates";
const CMD_REMAP: &str = "remap";

/// Pool file locations, falling back to `config/` paths.
fn pool_source(pools: Option<Utf8PathBuf>, example: Option<Utf8PathBuf>) -> PoolSource {
    let defaults = PoolSource::default();
    PoolSource::new(
        pools.unwrap_or(defaults.primary),
        example.unwrap_or(defaults.example),
    )
}

/// Seeded generator when `seed` is set, otherwise the thread generator.
fn rng_for(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(value) => Box::new(ChaCha8Rng::seed_from_u64(value)),
        None => Box::new(rand::thread_rng()),
    }
}

/// CLI arguments for the `draw` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "draw", about = "Draw one outcome from a gacha pool")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct DrawArgs {
    /// Pool definitions file (default `config/gacha.json`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) pools: Option<Utf8PathBuf>,
    /// Example copied over the pool file when it is missing.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) example: Option<Utf8PathBuf>,
    /// Pool to draw from.
    #[arg(long = ARG_POOL, value_name = "name")]
    #[serde(default)]
    pub(crate) pool: Option<String>,
    /// Seed for a reproducible draw.
    #[arg(long, value_name = "number")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl DrawArgs {
    fn into_config(self) -> Result<DrawConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DrawConfig::try_from(merged)
    }
}

/// Resolved `draw` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DrawConfig {
    pub(crate) source: PoolSource,
    pub(crate) pool: String,
    pub(crate) seed: Option<u64>,
}

impl TryFrom<DrawArgs> for DrawConfig {
    type Error = CliError;

    fn try_from(args: DrawArgs) -> Result<Self, Self::Error> {
        let pool = args.pool.ok_or_else(|| missing(CMD_DRAW, ARG_POOL))?;
        Ok(Self {
            source: pool_source(args.pools, args.example),
            pool,
            seed: args.seed,
        })
    }
}

pub(crate) fn run_draw(args: DrawArgs, out: &mut dyn Write) -> Result<(), CliError> {
    execute_draw(&args.into_config()?, out)
}

pub(crate) fn execute_draw(config: &DrawConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let registry = PoolRegistry::load(&config.source)?;
    if registry.get(&config.pool).is_none() {
        return Err(CliError::UnknownPool {
            pool: config.pool.clone(),
        });
    }
    let mut rng = rng_for(config.seed);
    let drawn = registry.draw(&config.pool, &mut *rng).unwrap_or("(no outcome)");
    write_line(out, drawn)
}

/// CLI arguments for the `rates` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "rates", about = "Print the odds of a gacha pool")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct RatesArgs {
    /// Pool definitions file (default `config/gacha.json`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) pools: Option<Utf8PathBuf>,
    /// Example copied over the pool file when it is missing.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) example: Option<Utf8PathBuf>,
    /// Pool to describe.
    #[arg(long = ARG_POOL, value_name = "name")]
    #[serde(default)]
    pub(crate) pool: Option<String>,
}

impl RatesArgs {
    fn into_config(self) -> Result<RatesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RatesConfig::try_from(merged)
    }
}

/// Resolved `rates` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RatesConfig {
    pub(crate) source: PoolSource,
    pub(crate) pool: String,
}

impl TryFrom<RatesArgs> for RatesConfig {
    type Error = CliError;

    fn try_from(args: RatesArgs) -> Result<Self, Self::Error> {
        let pool = args.pool.ok_or_else(|| missing(CMD_RATES, ARG_POOL))?;
        Ok(Self {
            source: pool_source(args.pools, args.example),
            pool,
        })
    }
}

pub(crate) fn run_rates(args: RatesArgs, out: &mut dyn Write) -> Result<(), CliError> {
    execute_rates(&args.into_config()?, out)
}

pub(crate) fn execute_rates(config: &RatesConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let registry = PoolRegistry::load(&config.source)?;
    write_rates(&registry, &config.pool, out)
}

fn write_rates(registry: &PoolRegistry, pool: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let table = registry
        .rate_table(pool)
        .ok_or_else(|| CliError::UnknownPool {
            pool: pool.to_owned(),
        })?;
    write_line(out, &table.to_string())
}

/// CLI arguments for the `remap` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "remap", about = "Apply aliases and gacha draws to a command line")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct RemapArgs {
    /// Pool definitions file (default `config/gacha.json`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) pools: Option<Utf8PathBuf>,
    /// Example copied over the pool file when it is missing.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) example: Option<Utf8PathBuf>,
    /// Alias table mapping commands to their alternative spellings.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) aliases: Option<Utf8PathBuf>,
    /// Seed for a reproducible draw.
    #[arg(long, value_name = "number")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Command as typed by the user.
    #[arg(long = ARG_COMMAND, value_name = "name")]
    #[serde(default)]
    pub(crate) command: Option<String>,
    /// Arguments following the command.
    #[arg(value_name = "arg", trailing_var_arg = true)]
    #[serde(default)]
    pub(crate) args: Vec<String>,
}

impl RemapArgs {
    fn into_config(self) -> Result<RemapConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RemapConfig::try_from(merged)
    }
}

/// Resolved `remap` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RemapConfig {
    pub(crate) source: PoolSource,
    pub(crate) aliases: Option<Utf8PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) command: String,
    pub(crate) args: Vec<String>,
}

impl TryFrom<RemapArgs> for RemapConfig {
    type Error = CliError;

    fn try_from(args: RemapArgs) -> Result<Self, Self::Error> {
        let command = args.command.ok_or_else(|| missing(CMD_REMAP, ARG_COMMAND))?;
        Ok(Self {
            source: pool_source(args.pools, args.example),
            aliases: args.aliases,
            seed: args.seed,
            command,
            args: args.args,
        })
    }
}

pub(crate) fn run_remap(args: RemapArgs, out: &mut dyn Write) -> Result<(), CliError> {
    execute_remap(&args.into_config()?, out)
}

pub(crate) fn execute_remap(config: &RemapConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let aliases = config
        .aliases
        .as_deref()
        .map(AliasTable::load)
        .transpose()?;
    let pools = PoolRegistry::load(&config.source)?;
    let remapper = CommandRemapper::new(aliases, Some(pools));
    let mut rng = rng_for(config.seed);
    match remapper.remap(&config.command, &config.args, &mut *rng) {
        Some(remapped) if remapped.command == RATES_COMMAND => {
            let pool = remapped.args.first().map_or("", String::as_str);
            let registry = remapper.pools().ok_or_else(|| CliError::UnknownPool {
                pool: pool.to_owned(),
            })?;
            write_rates(registry, pool, out)
        }
        Some(remapped) => write_line(out, &command_line(&remapped)),
        None => write_line(out, "(no command)"),
    }
}

fn command_line(remapped: &RemappedCommand) -> String {
    std::iter::once(remapped.command.as_str())
        .chain(remapped.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
