//! Unit tests for argument parsing and shared CLI helpers.

use super::*;
use camino::Utf8Path;
use rstest::rstest;

#[rstest]
#[case::data_root("queue", ARG_DATA_ROOT, "BILLBOARD_CMDS_QUEUE_DATA_ROOT")]
#[case::pool("draw", ARG_POOL, "BILLBOARD_CMDS_DRAW_POOL")]
#[case::command("remap", ARG_COMMAND, "BILLBOARD_CMDS_REMAP_COMMAND")]
fn env_var_follows_subcommand_naming(
    #[case] command: &str,
    #[case] field: &str,
    #[case] expected: &str,
) {
    assert_eq!(env_var(command, field), expected);
}

#[rstest]
fn missing_reports_flag_and_environment() {
    let err = missing("show", ARG_TENANT);

    assert_eq!(
        err.to_string(),
        "missing tenant (set --tenant or BILLBOARD_CMDS_SHOW_TENANT)"
    );
}

#[rstest]
fn queue_flags_parse_into_args() {
    let cli = Cli::try_parse_from([
        "billboard",
        "queue",
        "--data-root",
        "/srv/billboard",
        "--tenant",
        "G1",
        "--item",
        "v1",
        "--title",
        "Song",
    ])
    .expect("queue arguments should parse");

    let Command::Queue(args) = cli.command else {
        panic!("expected queue subcommand");
    };
    assert_eq!(
        args.data_root.as_deref().map(Utf8Path::as_str),
        Some("/srv/billboard")
    );
    assert_eq!(args.tenant.as_deref(), Some("G1"));
    assert_eq!(args.item.as_deref(), Some("v1"));
    assert_eq!(args.title.as_deref(), Some("Song"));
    assert_eq!(args.board, None);
}

#[rstest]
fn remap_collects_trailing_arguments() {
    let cli = Cli::try_parse_from([
        "billboard",
        "remap",
        "--command",
        "gacha",
        "songs",
        "loud",
    ])
    .expect("remap arguments should parse");

    let Command::Remap(args) = cli.command else {
        panic!("expected remap subcommand");
    };
    assert_eq!(args.command.as_deref(), Some("gacha"));
    assert_eq!(args.args, vec!["songs", "loud"]);
}

#[rstest]
fn unknown_subcommand_is_rejected() {
    let err = Cli::try_parse_from(["billboard", "launch"]).expect_err("unknown subcommand");
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
}

#[rstest]
fn write_line_appends_newline() {
    let mut out = Vec::new();
    write_line(&mut out, "hello").expect("write");
    assert_eq!(out, b"hello\n");
}
