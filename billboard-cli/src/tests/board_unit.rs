//! Unit tests for the leaderboard subcommands.

use super::helpers::{DataRoot, capture, write_utf8};
use super::*;
use crate::board::{
    HistoryArgs, HistoryConfig, QueueArgs, QueueConfig, ShowArgs, ShowConfig, TickArgs,
    TickConfig, execute_history, execute_queue, execute_show, execute_tick,
    queue_config_from_layers_for_test,
};
use billboard_chart::{ChartTable, DEFAULT_DISPLAY_SIZE, DEFAULT_RECOMPUTE_INTERVAL_DAYS};
use billboard_core::TenantId;
use camino::Utf8PathBuf;
use chrono::TimeDelta;
use rstest::{fixture, rstest};

#[fixture]
fn data_root() -> DataRoot {
    DataRoot::with_tenants(&["G1", "G2"])
}

fn queue_config(root: &DataRoot, tenant: &str, item: &str, title: &str) -> QueueConfig {
    QueueConfig::try_from(QueueArgs {
        data_root: Some(root.root().to_owned()),
        tenant: Some(tenant.to_owned()),
        item: Some(item.to_owned()),
        title: Some(title.to_owned()),
        ..QueueArgs::default()
    })
    .expect("queue config")
}

fn show_config(root: &DataRoot, tenant: &str) -> ShowConfig {
    ShowConfig::try_from(ShowArgs {
        data_root: Some(root.root().to_owned()),
        tenant: Some(tenant.to_owned()),
        title_width: Some(10),
        count_width: Some(7),
        ..ShowArgs::default()
    })
    .expect("show config")
}

fn tick_config(root: &DataRoot, force: bool) -> TickConfig {
    TickConfig::try_from(TickArgs {
        data_root: Some(root.root().to_owned()),
        force,
        ..TickArgs::default()
    })
    .expect("tick config")
}

fn history_config(root: &DataRoot, tenant: &str) -> HistoryConfig {
    HistoryConfig::try_from(HistoryArgs {
        data_root: Some(root.root().to_owned()),
        tenant: Some(tenant.to_owned()),
        board: None,
    })
    .expect("history config")
}

fn queue(root: &DataRoot, tenant: &str, item: &str, title: &str) -> String {
    let config = queue_config(root, tenant, item, title);
    capture(|out| execute_queue(&config, root.clock(), out))
}

#[rstest]
#[case::queue_root(
    QueueConfig::try_from(QueueArgs::default()).map(|_| ()),
    ARG_DATA_ROOT,
    "BILLBOARD_CMDS_QUEUE_DATA_ROOT"
)]
#[case::queue_item(
    QueueConfig::try_from(QueueArgs {
        data_root: Some(Utf8PathBuf::from("/srv")),
        tenant: Some("G1".to_owned()),
        ..QueueArgs::default()
    }).map(|_| ()),
    ARG_ITEM,
    "BILLBOARD_CMDS_QUEUE_ITEM"
)]
#[case::show_tenant(
    ShowConfig::try_from(ShowArgs {
        data_root: Some(Utf8PathBuf::from("/srv")),
        ..ShowArgs::default()
    }).map(|_| ()),
    ARG_TENANT,
    "BILLBOARD_CMDS_SHOW_TENANT"
)]
#[case::history_tenant(
    HistoryConfig::try_from(HistoryArgs {
        data_root: Some(Utf8PathBuf::from("/srv")),
        ..HistoryArgs::default()
    }).map(|_| ()),
    ARG_TENANT,
    "BILLBOARD_CMDS_HISTORY_TENANT"
)]
fn missing_options_name_flag_and_environment(
    #[case] result: Result<(), CliError>,
    #[case] expected_field: &'static str,
    #[case] expected_env: &str,
) {
    match result {
        Err(CliError::MissingArgument { field, env }) => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn queue_config_applies_board_defaults() {
    let config = QueueConfig::try_from(QueueArgs {
        data_root: Some(Utf8PathBuf::from("/srv")),
        tenant: Some("G1".to_owned()),
        item: Some("v1".to_owned()),
        ..QueueArgs::default()
    })
    .expect("config should build");

    assert_eq!(config.board.name.as_str(), "Cumulative");
    assert_eq!(config.board.display_size, DEFAULT_DISPLAY_SIZE);
    assert_eq!(
        config.board.recompute_interval_days,
        DEFAULT_RECOMPUTE_INTERVAL_DAYS
    );
    assert_eq!(config.item.id.as_str(), "v1");
    assert_eq!(config.item.title, None);
}

#[rstest]
#[case::tenant_with_separator(Some("a/b"), None, ARG_TENANT)]
#[case::dot_board(Some("G1"), Some(".."), ARG_BOARD)]
fn identifiers_are_validated(
    #[case] tenant: Option<&str>,
    #[case] board: Option<&str>,
    #[case] expected_field: &'static str,
) {
    let err = QueueConfig::try_from(QueueArgs {
        data_root: Some(Utf8PathBuf::from("/srv")),
        tenant: tenant.map(str::to_owned),
        board: board.map(str::to_owned),
        item: Some("v1".to_owned()),
        ..QueueArgs::default()
    })
    .expect_err("invalid identifier should be rejected");

    match err {
        CliError::InvalidIdentifier { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected InvalidIdentifier, found {other:?}"),
    }
}

#[rstest]
fn show_config_uses_table_defaults_when_unset() {
    let config = ShowConfig::try_from(ShowArgs {
        data_root: Some(Utf8PathBuf::from("/srv")),
        tenant: Some("G1".to_owned()),
        ..ShowArgs::default()
    })
    .expect("config should build");

    assert_eq!(config.table, ChartTable::default());
    assert!(!config.detailed);
    assert_eq!(config.archive, None);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "display_size": "many" }));

    let err = queue_config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "data_root": "/from-file",
            "tenant": "FileTenant",
            "display_size": 5,
        }),
        None,
    );
    composer.push_environment(json!({
        "data_root": "/from-env",
        "item": "env-item",
    }));
    composer.push_cli(json!({
        "data_root": "/from-cli",
    }));

    let config =
        queue_config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.data_root, Utf8PathBuf::from("/from-cli"));
    assert_eq!(config.board.tenant.as_str(), "FileTenant");
    assert_eq!(config.board.display_size, 5);
    assert_eq!(config.item.id.as_str(), "env-item");
}

#[rstest]
fn queue_counts_each_request(data_root: DataRoot) {
    assert_eq!(
        queue(&data_root, "G1", "v1", "Song"),
        "Song requested 1 times\n"
    );
    assert_eq!(
        queue(&data_root, "G1", "v1", "Song"),
        "Song requested 2 times\n"
    );
}

#[rstest]
fn queue_into_missing_tenant_fails(data_root: DataRoot) {
    let config = queue_config(&data_root, "absent", "v1", "Song");
    let mut out = Vec::new();

    let err = execute_queue(&config, data_root.clock(), &mut out)
        .expect_err("missing tenant root should fail");

    assert!(matches!(err, CliError::Leaderboard(_)));
    assert!(out.is_empty());
}

#[rstest]
fn show_before_any_recompute_prints_empty_chart(data_root: DataRoot) {
    let config = show_config(&data_root, "G1");

    let printed = capture(|out| execute_show(&config, data_root.clock(), out));

    assert_eq!(
        printed,
        "G1/Cumulative as of 19700101000000\n--Title---|-Queue-\n"
    );
}

#[rstest]
fn tick_publishes_what_show_prints(data_root: DataRoot) {
    queue(&data_root, "G1", "v1", "Song");
    queue(&data_root, "G1", "v2", "Other");
    queue(&data_root, "G1", "v2", "Other");

    let ticked = capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));
    assert_eq!(
        ticked,
        "recomputed G1/Cumulative\nrecomputed G2/Cumulative\n0 not due\n"
    );

    let printed = capture(|out| execute_show(&show_config(&data_root, "G1"), data_root.clock(), out));
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(
        lines,
        vec![
            "G1/Cumulative as of 20240301000000",
            "--Title---|-Queue-",
            "Other     |   2   ",
            "Song      |   1   ",
        ]
    );
}

#[rstest]
fn tick_skips_boards_that_are_not_due(data_root: DataRoot) {
    capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));
    data_root.manual_clock().advance(TimeDelta::days(1));

    let ticked = capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));

    assert_eq!(ticked, "2 not due\n");
}

#[rstest]
fn forced_tick_recomputes_every_board(data_root: DataRoot) {
    capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));

    let ticked = capture(|out| execute_tick(&tick_config(&data_root, true), data_root.clock(), out));

    assert_eq!(
        ticked,
        "recomputed G1/Cumulative\nrecomputed G2/Cumulative\n"
    );
}

#[rstest]
fn tick_reports_failures_and_continues(data_root: DataRoot) {
    capture(|out| execute_tick(&tick_config(&data_root, true), data_root.clock(), out));
    write_utf8(
        &data_root.root().join("G1/billboard/Cumulative/items/broken.json"),
        "not json",
    );
    data_root.manual_clock().advance(TimeDelta::days(7));

    let ticked = capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));
    let lines: Vec<&str> = ticked.lines().collect();

    assert_eq!(lines.first().copied(), Some("recomputed G2/Cumulative"));
    assert!(
        lines
            .get(1)
            .is_some_and(|line| line.starts_with("failed G1/Cumulative: ")),
        "unexpected output: {ticked}"
    );
    assert_eq!(lines.get(2).copied(), Some("0 not due"));
}

#[rstest]
fn tick_ignores_hidden_directories(data_root: DataRoot) {
    billboard_fs::ensure_dir(&data_root.root().join(".hidden")).expect("hidden dir");
    let config = tick_config(&data_root, false);

    let ticked = capture(|out| execute_tick(&config, data_root.clock(), out));

    assert_eq!(
        ticked,
        "recomputed G1/Cumulative\nrecomputed G2/Cumulative\n0 not due\n"
    );
}

#[rstest]
fn tick_can_target_one_tenant(data_root: DataRoot) {
    let config = TickConfig::try_from(TickArgs {
        data_root: Some(data_root.root().to_owned()),
        tenant: Some("G2".to_owned()),
        ..TickArgs::default()
    })
    .expect("tick config");
    assert_eq!(
        config.scope.tenant,
        Some(TenantId::new("G2").expect("tenant id"))
    );

    let ticked = capture(|out| execute_tick(&config, data_root.clock(), out));

    assert_eq!(ticked, "recomputed G2/Cumulative\n0 not due\n");
}

#[rstest]
fn history_lists_archives_and_show_opens_them(data_root: DataRoot) {
    assert_eq!(
        capture(|out| execute_history(&history_config(&data_root, "G1"), data_root.clock(), out)),
        "no archived snapshots\n"
    );

    queue(&data_root, "G1", "v1", "Song");
    capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));

    assert_eq!(
        capture(|out| execute_history(&history_config(&data_root, "G1"), data_root.clock(), out)),
        "19700101000000\n"
    );

    let mut config = show_config(&data_root, "G1");
    config.archive = Some("19700101000000".to_owned());
    let printed = capture(|out| execute_show(&config, data_root.clock(), out));
    assert_eq!(
        printed,
        "G1/Cumulative as of 19700101000000\n--Title---|-Queue-\n"
    );
}

#[rstest]
fn show_detailed_lists_chart_entries(data_root: DataRoot) {
    queue(&data_root, "G1", "v1", "Song");
    capture(|out| execute_tick(&tick_config(&data_root, false), data_root.clock(), out));
    let mut config = show_config(&data_root, "G1");
    config.detailed = true;

    let printed = capture(|out| execute_show(&config, data_root.clock(), out));

    let last = printed.lines().last().expect("entry line");
    assert!(last.starts_with("1. Song | 1 requests"), "unexpected line: {last}");
    assert!(last.ends_with(" *"), "leader should be marked: {last}");
}

#[rstest]
fn unknown_archive_is_an_error(data_root: DataRoot) {
    let mut config = show_config(&data_root, "G1");
    config.archive = Some("20000101000000".to_owned());
    let mut out = Vec::new();

    let err = execute_show(&config, data_root.clock(), &mut out).expect_err("unknown archive");

    assert!(matches!(err, CliError::Registry(_)));
}
