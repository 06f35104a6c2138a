//! Leaderboard subcommands: `queue`, `show`, `tick`, `serve` and `history`.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use billboard_chart::{
    ChartEntry, ChartTable, ChartView, DEFAULT_BOARD_NAME, DEFAULT_DISPLAY_SIZE,
    DEFAULT_RECOMPUTE_INTERVAL_DAYS, DEFAULT_TICK_PERIOD, Leaderboard, LeaderboardConfig,
    LeaderboardRegistry, RecomputeScheduler, RegistryError, Snapshot,
};
use billboard_core::clock::format_timestamp;
use billboard_core::{BoardName, Clock, ItemId, ItemInfo, TenantId};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BOARD, ARG_DATA_ROOT, ARG_ITEM, ARG_TENANT, CliError, missing, write_line,
};

const CMD_QUEUE: &str = "queue";
const CMD_SHOW: &str = "show";
const CMD_TICK: &str = "tick";
const CMD_SERVE: &str = "serve";
const CMD_HISTORY: &str = "history";

/// Name, size and cadence shared by every board a command touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoardShape {
    pub(crate) name: BoardName,
    pub(crate) display_size: usize,
    pub(crate) interval_days: u32,
}

impl BoardShape {
    fn resolve(
        board: Option<String>,
        display_size: Option<usize>,
        interval_days: Option<u32>,
    ) -> Result<Self, CliError> {
        let raw = board.unwrap_or_else(|| DEFAULT_BOARD_NAME.to_owned());
        let name = BoardName::new(raw).map_err(|source| CliError::InvalidIdentifier {
            field: ARG_BOARD,
            source,
        })?;
        Ok(Self {
            name,
            display_size: display_size.unwrap_or(DEFAULT_DISPLAY_SIZE),
            interval_days: interval_days.unwrap_or(DEFAULT_RECOMPUTE_INTERVAL_DAYS),
        })
    }

    fn config_for(&self, tenant: TenantId) -> LeaderboardConfig {
        LeaderboardConfig::new(
            tenant,
            self.name.clone(),
            self.display_size,
            self.interval_days,
        )
    }
}

fn require_data_root(
    command: &'static str,
    data_root: Option<Utf8PathBuf>,
) -> Result<Utf8PathBuf, CliError> {
    data_root.ok_or_else(|| missing(command, ARG_DATA_ROOT))
}

fn parse_tenant(raw: String) -> Result<TenantId, CliError> {
    TenantId::new(raw).map_err(|source| CliError::InvalidIdentifier {
        field: ARG_TENANT,
        source,
    })
}

fn require_tenant(command: &'static str, tenant: Option<String>) -> Result<TenantId, CliError> {
    parse_tenant(tenant.ok_or_else(|| missing(command, ARG_TENANT))?)
}

/// CLI arguments for the `queue` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "queue", about = "Count one request for an item")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct QueueArgs {
    /// Directory holding one sub-directory per tenant.
    #[arg(long = ARG_DATA_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_root: Option<Utf8PathBuf>,
    /// Tenant owning the leaderboard.
    #[arg(long = ARG_TENANT, value_name = "id")]
    #[serde(default)]
    pub(crate) tenant: Option<String>,
    /// Leaderboard name (default "Cumulative").
    #[arg(long = ARG_BOARD, value_name = "name")]
    #[serde(default)]
    pub(crate) board: Option<String>,
    /// Number of items kept on the chart.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) display_size: Option<usize>,
    /// Days between scheduled recomputes.
    #[arg(long, value_name = "days")]
    #[serde(default)]
    pub(crate) interval_days: Option<u32>,
    /// Identifier of the requested item.
    #[arg(long = ARG_ITEM, value_name = "id")]
    #[serde(default)]
    pub(crate) item: Option<String>,
    /// Display title of the requested item.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) title: Option<String>,
}

impl QueueArgs {
    fn into_config(self) -> Result<QueueConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        QueueConfig::try_from(merged)
    }
}

/// Resolved `queue` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueueConfig {
    pub(crate) data_root: Utf8PathBuf,
    pub(crate) board: LeaderboardConfig,
    pub(crate) item: ItemInfo,
}

impl TryFrom<QueueArgs> for QueueConfig {
    type Error = CliError;

    fn try_from(args: QueueArgs) -> Result<Self, Self::Error> {
        let data_root = require_data_root(CMD_QUEUE, args.data_root)?;
        let tenant = require_tenant(CMD_QUEUE, args.tenant)?;
        let shape = BoardShape::resolve(args.board, args.display_size, args.interval_days)?;
        let raw_item = args.item.ok_or_else(|| missing(CMD_QUEUE, ARG_ITEM))?;
        let id = ItemId::new(raw_item).map_err(|source| CliError::InvalidIdentifier {
            field: ARG_ITEM,
            source,
        })?;
        Ok(Self {
            data_root,
            board: shape.config_for(tenant),
            item: ItemInfo::new(id, args.title),
        })
    }
}

pub(crate) fn run_queue(
    args: QueueArgs,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    execute_queue(&args.into_config()?, clock, out)
}

pub(crate) fn execute_queue(
    config: &QueueConfig,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let live = Leaderboard::open(&config.data_root, config.board.clone(), clock)?;
    let item = live.record(&config.item)?;
    write_line(
        out,
        &format!(
            "{} requested {} times",
            item.display_title(),
            item.times_requested()
        ),
    )
}

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "show", about = "Print a published or archived chart")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct ShowArgs {
    /// Directory holding one sub-directory per tenant.
    #[arg(long = ARG_DATA_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_root: Option<Utf8PathBuf>,
    /// Tenant owning the leaderboard.
    #[arg(long = ARG_TENANT, value_name = "id")]
    #[serde(default)]
    pub(crate) tenant: Option<String>,
    /// Leaderboard name (default "Cumulative").
    #[arg(long = ARG_BOARD, value_name = "name")]
    #[serde(default)]
    pub(crate) board: Option<String>,
    /// Number of items kept on the chart.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) display_size: Option<usize>,
    /// Days between scheduled recomputes.
    #[arg(long, value_name = "days")]
    #[serde(default)]
    pub(crate) interval_days: Option<u32>,
    /// Archived snapshot to print instead of the published one.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) archive: Option<String>,
    /// Width of the title column.
    #[arg(long, value_name = "chars")]
    #[serde(default)]
    pub(crate) title_width: Option<usize>,
    /// Width of the request count column.
    #[arg(long, value_name = "chars")]
    #[serde(default)]
    pub(crate) count_width: Option<usize>,
    /// Also print weeks on chart, last position and movement.
    #[arg(long)]
    #[serde(default)]
    pub(crate) detailed: bool,
}

impl ShowArgs {
    fn into_config(self) -> Result<ShowConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShowConfig::try_from(merged)
    }
}

/// Resolved `show` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShowConfig {
    pub(crate) data_root: Utf8PathBuf,
    pub(crate) board: LeaderboardConfig,
    pub(crate) archive: Option<String>,
    pub(crate) table: ChartTable,
    pub(crate) detailed: bool,
}

impl TryFrom<ShowArgs> for ShowConfig {
    type Error = CliError;

    fn try_from(args: ShowArgs) -> Result<Self, Self::Error> {
        let data_root = require_data_root(CMD_SHOW, args.data_root)?;
        let tenant = require_tenant(CMD_SHOW, args.tenant)?;
        let shape = BoardShape::resolve(args.board, args.display_size, args.interval_days)?;
        let defaults = ChartTable::default();
        Ok(Self {
            data_root,
            board: shape.config_for(tenant),
            archive: args.archive,
            table: ChartTable::new(
                args.title_width.unwrap_or(defaults.title_width),
                args.count_width.unwrap_or(defaults.count_width),
            ),
            detailed: args.detailed,
        })
    }
}

pub(crate) fn run_show(
    args: ShowArgs,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    execute_show(&args.into_config()?, clock, out)
}

pub(crate) fn execute_show(
    config: &ShowConfig,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let registry = LeaderboardRegistry::new(config.data_root.clone(), clock);
    registry.register(registry.open_leaderboard(config.board.clone())?)?;
    let tenant = &config.board.tenant;
    let name = &config.board.name;
    let snapshot = match &config.archive {
        Some(archive) => Arc::new(registry.open_archive(tenant, name, archive)?),
        None => registry
            .get(tenant, name)
            .ok_or_else(|| RegistryError::UnknownLeaderboard {
                tenant: tenant.clone(),
                name: name.clone(),
            })?,
    };
    write_chart(&snapshot, config, out)
}

fn write_chart(snapshot: &Snapshot, config: &ShowConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let items = snapshot.top_items(snapshot.display_size())?;
    write_line(
        out,
        &format!(
            "{}/{} as of {}",
            snapshot.tenant_id(),
            snapshot.name(),
            format_timestamp(snapshot.last_recomputed_at())
        ),
    )?;
    out.write_all(config.table.render(&items).as_bytes())
        .map_err(CliError::WriteOutput)?;
    if config.detailed {
        for entry in ChartEntry::list(&items) {
            let marker = if entry.is_leader() { " *" } else { "" };
            write_line(
                out,
                &format!(
                    "{}. {} | {} requests | weeks: {} | last: {} | {:?}{marker}",
                    entry.place,
                    entry.title,
                    entry.times_requested,
                    entry.weeks_on_chart,
                    entry.position_last_period,
                    entry.movement,
                ),
            )?;
        }
    }
    Ok(())
}

/// CLI arguments for the `tick` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "tick", about = "Recompute due leaderboards once")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct TickArgs {
    /// Directory holding one sub-directory per tenant.
    #[arg(long = ARG_DATA_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_root: Option<Utf8PathBuf>,
    /// Only this tenant; every tenant directory when omitted.
    #[arg(long = ARG_TENANT, value_name = "id")]
    #[serde(default)]
    pub(crate) tenant: Option<String>,
    /// Leaderboard name (default "Cumulative").
    #[arg(long = ARG_BOARD, value_name = "name")]
    #[serde(default)]
    pub(crate) board: Option<String>,
    /// Number of items kept on the chart.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) display_size: Option<usize>,
    /// Days between scheduled recomputes.
    #[arg(long, value_name = "days")]
    #[serde(default)]
    pub(crate) interval_days: Option<u32>,
    /// Recompute even when a board is not yet due.
    #[arg(long)]
    #[serde(default)]
    pub(crate) force: bool,
}

impl TickArgs {
    fn into_config(self) -> Result<TickConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        TickConfig::try_from(merged)
    }
}

/// Tenants and board shape shared by `tick` and `serve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoardScope {
    pub(crate) data_root: Utf8PathBuf,
    pub(crate) tenant: Option<TenantId>,
    pub(crate) shape: BoardShape,
}

impl BoardScope {
    fn resolve(
        command: &'static str,
        data_root: Option<Utf8PathBuf>,
        tenant: Option<String>,
        shape: BoardShape,
    ) -> Result<Self, CliError> {
        Ok(Self {
            data_root: require_data_root(command, data_root)?,
            tenant: tenant.map(parse_tenant).transpose()?,
            shape,
        })
    }

    /// Registry with this scope's board registered for each tenant.
    fn registry(&self, clock: Arc<dyn Clock>) -> Result<LeaderboardRegistry, CliError> {
        let registry = LeaderboardRegistry::new(self.data_root.clone(), clock);
        for tenant in self.tenants()? {
            registry.register(registry.open_leaderboard(self.shape.config_for(tenant))?)?;
        }
        Ok(registry)
    }

    fn tenants(&self) -> Result<Vec<TenantId>, CliError> {
        if let Some(tenant) = &self.tenant {
            return Ok(vec![tenant.clone()]);
        }
        list_tenants(&self.data_root)
    }
}

fn list_tenants(data_root: &Utf8Path) -> Result<Vec<TenantId>, CliError> {
    let names = billboard_fs::list_dir_names(data_root).map_err(|source| CliError::ListTenants {
        path: data_root.to_owned(),
        source,
    })?;
    Ok(names
        .into_iter()
        .filter_map(|name| match TenantId::new(name.as_str()) {
            Ok(tenant) => Some(tenant),
            Err(err) => {
                log::warn!("skipping tenant directory `{name}`: {err}");
                None
            }
        })
        .collect())
}

/// Resolved `tick` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TickConfig {
    pub(crate) scope: BoardScope,
    pub(crate) force: bool,
}

impl TryFrom<TickArgs> for TickConfig {
    type Error = CliError;

    fn try_from(args: TickArgs) -> Result<Self, Self::Error> {
        let shape = BoardShape::resolve(args.board, args.display_size, args.interval_days)?;
        Ok(Self {
            scope: BoardScope::resolve(CMD_TICK, args.data_root, args.tenant, shape)?,
            force: args.force,
        })
    }
}

pub(crate) fn run_tick(
    args: TickArgs,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    execute_tick(&args.into_config()?, clock, out)
}

pub(crate) fn execute_tick(
    config: &TickConfig,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let registry = config.scope.registry(clock)?;
    if config.force {
        for (tenant, name) in registry.boards() {
            registry.force_recompute(&tenant, &name)?;
            write_line(out, &format!("recomputed {tenant}/{name}"))?;
        }
        return Ok(());
    }
    let report = registry.tick();
    for (tenant, name) in &report.recomputed {
        write_line(out, &format!("recomputed {tenant}/{name}"))?;
    }
    for failure in &report.failures {
        write_line(
            out,
            &format!("failed {}/{}: {}", failure.tenant, failure.name, failure.error),
        )?;
    }
    write_line(out, &format!("{} not due", report.skipped))
}

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "serve", about = "Recompute leaderboards on a schedule")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct ServeArgs {
    /// Directory holding one sub-directory per tenant.
    #[arg(long = ARG_DATA_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_root: Option<Utf8PathBuf>,
    /// Only this tenant; every tenant directory when omitted.
    #[arg(long = ARG_TENANT, value_name = "id")]
    #[serde(default)]
    pub(crate) tenant: Option<String>,
    /// Leaderboard name (default "Cumulative").
    #[arg(long = ARG_BOARD, value_name = "name")]
    #[serde(default)]
    pub(crate) board: Option<String>,
    /// Number of items kept on the chart.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) display_size: Option<usize>,
    /// Days between scheduled recomputes.
    #[arg(long, value_name = "days")]
    #[serde(default)]
    pub(crate) interval_days: Option<u32>,
    /// Seconds between ticks (default one hour).
    #[arg(long, value_name = "seconds")]
    #[serde(default)]
    pub(crate) period_secs: Option<u64>,
}

impl ServeArgs {
    fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) scope: BoardScope,
    pub(crate) period: Duration,
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let shape = BoardShape::resolve(args.board, args.display_size, args.interval_days)?;
        Ok(Self {
            scope: BoardScope::resolve(CMD_SERVE, args.data_root, args.tenant, shape)?,
            period: args
                .period_secs
                .map_or(DEFAULT_TICK_PERIOD, Duration::from_secs),
        })
    }
}

pub(crate) fn run_serve(
    args: ServeArgs,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let registry = Arc::new(config.scope.registry(clock)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(async {
        let handle = RecomputeScheduler::spawn(Arc::clone(&registry), config.period);
        write_line(
            out,
            &format!(
                "serving {} leaderboards every {:?}; press Ctrl-C to stop",
                registry.boards().len(),
                config.period
            ),
        )?;
        tokio::signal::ctrl_c().await.map_err(CliError::Runtime)?;
        let ticks = handle.ticks();
        handle.shutdown().await.map_err(CliError::Scheduler)?;
        write_line(out, &format!("stopped after {ticks} ticks"))
    })
}

/// CLI arguments for the `history` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "history", about = "List archived snapshots")]
#[ortho_config(prefix = "BILLBOARD")]
pub(crate) struct HistoryArgs {
    /// Directory holding one sub-directory per tenant.
    #[arg(long = ARG_DATA_ROOT, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_root: Option<Utf8PathBuf>,
    /// Tenant owning the leaderboard.
    #[arg(long = ARG_TENANT, value_name = "id")]
    #[serde(default)]
    pub(crate) tenant: Option<String>,
    /// Leaderboard name (default "Cumulative").
    #[arg(long = ARG_BOARD, value_name = "name")]
    #[serde(default)]
    pub(crate) board: Option<String>,
}

impl HistoryArgs {
    fn into_config(self) -> Result<HistoryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HistoryConfig::try_from(merged)
    }
}

/// Resolved `history` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryConfig {
    pub(crate) data_root: Utf8PathBuf,
    pub(crate) board: LeaderboardConfig,
}

impl TryFrom<HistoryArgs> for HistoryConfig {
    type Error = CliError;

    fn try_from(args: HistoryArgs) -> Result<Self, Self::Error> {
        let data_root = require_data_root(CMD_HISTORY, args.data_root)?;
        let tenant = require_tenant(CMD_HISTORY, args.tenant)?;
        let shape = BoardShape::resolve(args.board, None, None)?;
        Ok(Self {
            data_root,
            board: shape.config_for(tenant),
        })
    }
}

pub(crate) fn run_history(
    args: HistoryArgs,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    execute_history(&args.into_config()?, clock, out)
}

pub(crate) fn execute_history(
    config: &HistoryConfig,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let registry = LeaderboardRegistry::new(config.data_root.clone(), clock);
    registry.register(registry.open_leaderboard(config.board.clone())?)?;
    let archives = registry.list_archives(&config.board.tenant, &config.board.name)?;
    if archives.is_empty() {
        return write_line(out, "no archived snapshots");
    }
    for archive in archives {
        write_line(out, &archive)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn queue_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<QueueConfig, CliError> {
    let merged = QueueArgs::merge_from_layers(layers).map_err(CliError::from)?;
    QueueConfig::try_from(merged)
}
