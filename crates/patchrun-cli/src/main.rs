mod console;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Result};
use clap::Parser;
use patchrun_core::Roots;
use patchrun_engine::{run_update, EngineBackends, ProgressReporter, UpdateOptions, ZipPackage};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleReporter;

#[derive(Parser, Debug)]
#[command(name = "patchrun")]
#[command(about = "Applies a staged update package to a live installation", long_about = None)]
struct Cli {
    package_file: PathBuf,

    #[arg(long)]
    program_dir: PathBuf,

    #[arg(long)]
    relaunch: PathBuf,

    #[arg(long)]
    store: Option<PathBuf>,

    #[arg(long)]
    plain: bool,
}

fn default_store_path(program_dir: &Path) -> PathBuf {
    program_dir.join("patchrun-store.json")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let reporter = Arc::new(ConsoleReporter::new(cli.plain));

    let store_path = cli
        .store
        .unwrap_or_else(|| default_store_path(&cli.program_dir));
    let mut backends = match EngineBackends::system(&store_path) {
        Ok(backends) => backends,
        Err(err) => {
            reporter.initializing_fail(&err);
            reporter.terminate();
            return Err(err);
        }
    };

    let options = UpdateOptions {
        package_file: cli.package_file,
        application_executable: cli.relaunch,
    };
    let roots = Roots::discover(&cli.program_dir);
    let archive = ZipPackage::new(&options.package_file);

    info!(package = %options.package_file.display(), "starting update run");

    let worker_reporter = Arc::clone(&reporter);
    let worker = thread::spawn(move || {
        run_update(
            &options,
            &roots,
            &archive,
            &mut backends,
            worker_reporter.as_ref(),
        )
    });

    if let Err(err) = reporter.initialize() {
        reporter.initializing_fail(&err);
        reporter.terminate();
    }

    let outcome = worker
        .join()
        .map_err(|_| anyhow!("update worker panicked"))?;
    match outcome.failure {
        Some(failure) => Err(anyhow!(failure)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests;
