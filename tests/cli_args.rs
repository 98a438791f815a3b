//! CLI argument parsing tests.
//!
//! Tests that `EnableArgs` parses from command-line strings and resolves the
//! file paths relative to `--dir`.

use std::path::{Path, PathBuf};

use clap::Parser;

use misp_linotp::cli::EnableArgs;

// ─────────────────────────────────────────────────────────────────────────────
// Test Harness
// ─────────────────────────────────────────────────────────────────────────────

/// Minimal CLI parser that mirrors main.rs's Cli.
#[derive(Parser)]
#[command(name = "enable-linotp")]
struct TestCli {
    #[command(flatten)]
    args: EnableArgs,
}

fn parse(args: &[&str]) -> Result<EnableArgs, clap::Error> {
    TestCli::try_parse_from(args).map(|cli| cli.args)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults() {
    let args = parse(&["enable-linotp"]).unwrap();
    assert_eq!(args.dir, PathBuf::from("."));
    assert_eq!(args.bootstrap, PathBuf::from("bootstrap.php"));
    assert_eq!(args.config, PathBuf::from("config.php"));
    assert!(!args.dry_run);
    assert!(!args.keep_backups);
    assert!(!args.verbose);
    assert_eq!(args.config_path(), Path::new(".").join("config.php"));
}

#[test]
fn test_all_options() {
    let args = parse(&[
        "enable-linotp",
        "--dir",
        "/var/www/MISP/app/Config",
        "--bootstrap",
        "bootstrap.default.php",
        "--config",
        "config.default.php",
        "--dry-run",
        "--keep-backups",
        "--verbose",
    ])
    .unwrap();

    assert!(args.dry_run);
    assert!(args.keep_backups);
    assert!(args.verbose);
    assert_eq!(
        args.bootstrap_path(),
        PathBuf::from("/var/www/MISP/app/Config/bootstrap.default.php")
    );
    assert_eq!(
        args.config_path(),
        PathBuf::from("/var/www/MISP/app/Config/config.default.php")
    );
}

#[test]
fn test_absolute_file_overrides_dir() {
    let args = parse(&["enable-linotp", "--dir", "/srv", "--config", "/etc/misp/config.php"]).unwrap();
    assert_eq!(args.config_path(), PathBuf::from("/etc/misp/config.php"));
    assert_eq!(args.bootstrap_path(), PathBuf::from("/srv/bootstrap.php"));
}

#[test]
fn test_in_dir_matches_parsed_defaults() {
    let parsed = parse(&["enable-linotp", "--dir", "/srv"]).unwrap();
    let built = EnableArgs::in_dir("/srv");
    assert_eq!(parsed.bootstrap_path(), built.bootstrap_path());
    assert_eq!(parsed.config_path(), built.config_path());
    assert_eq!(parsed.dry_run, built.dry_run);
    assert_eq!(parsed.keep_backups, built.keep_backups);
}

#[test]
fn test_unknown_flag_rejected() {
    assert!(parse(&["enable-linotp", "--realm", "misp"]).is_err());
}
