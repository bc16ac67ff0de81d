use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use patchrun_engine::ProgressReporter;

use crate::console::ConsoleReporter;
use crate::{default_store_path, Cli};

#[test]
fn parses_required_arguments() {
    let cli = Cli::try_parse_from([
        "patchrun",
        "/staging/package.zip",
        "--program-dir",
        "/opt/app",
        "--relaunch",
        "/opt/app/app-bin",
    ])
    .expect("must parse");

    assert_eq!(cli.package_file, PathBuf::from("/staging/package.zip"));
    assert_eq!(cli.program_dir, PathBuf::from("/opt/app"));
    assert_eq!(cli.relaunch, PathBuf::from("/opt/app/app-bin"));
    assert!(cli.store.is_none());
    assert!(!cli.plain);
}

#[test]
fn rejects_a_missing_relaunch_target() {
    let result = Cli::try_parse_from([
        "patchrun",
        "/staging/package.zip",
        "--program-dir",
        "/opt/app",
    ]);
    assert!(result.is_err());
}

#[test]
fn store_defaults_into_the_program_dir() {
    assert_eq!(
        default_store_path(&PathBuf::from("/opt/app")),
        PathBuf::from("/opt/app").join("patchrun-store.json")
    );
}

#[test]
fn console_reporter_failures_terminate_and_double_terminate_is_tolerated() {
    let reporter = ConsoleReporter::new(true);
    assert!(reporter.fail(&anyhow!("boom")));
    reporter.terminate();
    reporter.terminate();
}
