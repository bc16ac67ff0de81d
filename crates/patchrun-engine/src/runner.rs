use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use patchrun_core::{ProgressState, Roots, UpdateManifest};
use tracing::{debug, error, info};

use crate::archive::PackageArchive;
use crate::executor::apply_operations;
use crate::kvstore::{JsonFileStore, KeyValueStore};
use crate::merge::{count_staged_files, merge_staged_folders};
use crate::process::{ProcessController, SystemProcessController};
use crate::reporter::ProgressReporter;
use crate::service::{ServiceController, SystemServiceController};
use crate::stage::{extract_package, ExtractionStatus};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub package_file: PathBuf,
    pub application_executable: PathBuf,
}

pub struct EngineBackends {
    pub store: Box<dyn KeyValueStore>,
    pub processes: Box<dyn ProcessController>,
    pub services: Box<dyn ServiceController>,
}

impl EngineBackends {
    pub fn system(store_path: &Path) -> Result<Self> {
        Ok(Self {
            store: Box::new(JsonFileStore::open(store_path)?),
            processes: Box::new(SystemProcessController),
            services: Box::new(SystemServiceController),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Failed,
    CleaningUp,
    Relaunched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub phase: RunPhase,
    pub failure: Option<String>,
}

pub fn run_update(
    options: &UpdateOptions,
    roots: &Roots,
    archive: &dyn PackageArchive,
    backends: &mut EngineBackends,
    reporter: &dyn ProgressReporter,
) -> UpdateOutcome {
    let mut phase = RunPhase::Running;

    let staging_dir = match options
        .package_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            anyhow!(
                "package file has no parent directory: {}",
                options.package_file.display()
            )
        }) {
        Ok(staging_dir) => staging_dir,
        Err(err) => {
            if reporter.fail(&err) {
                reporter.terminate();
            }
            return UpdateOutcome {
                phase: RunPhase::Failed,
                failure: Some(format!("{err:#}")),
            };
        }
    };

    info!(staging_dir = %staging_dir.display(), "extracting update package");
    if extract_package(archive, &staging_dir, reporter) == ExtractionStatus::Stopped {
        return UpdateOutcome {
            phase: RunPhase::Failed,
            failure: Some("package extraction was aborted".to_string()),
        };
    }

    let prepared = prepare_run(&staging_dir);
    let (manifest, mut state) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => {
            if reporter.fail(&err) {
                reporter.terminate();
            }
            return UpdateOutcome {
                phase: RunPhase::Failed,
                failure: Some(format!("{err:#}")),
            };
        }
    };

    info!(
        total = state.total(),
        multiplier = state.multiplier(),
        operations = manifest.operations.len(),
        "update planned"
    );
    merge_staged_folders(&staging_dir, roots, &mut state, reporter);

    let mut failure = None;
    if let Err(err) = apply_operations(
        &manifest.operations,
        roots,
        &mut state,
        backends,
        reporter,
    ) {
        transition(&mut phase, RunPhase::Failed);
        failure = Some(format!("{err:#}"));
        if reporter.fail(&err) {
            reporter.terminate();
        }
    }

    // Cleanup and relaunch happen regardless of how the loop ended.
    transition(&mut phase, RunPhase::CleaningUp);
    info!(staging_dir = %staging_dir.display(), "removing staging data");
    if let Err(err) = fs::remove_dir_all(&staging_dir)
        .with_context(|| format!("failed to remove staging data: {}", staging_dir.display()))
    {
        let _ = reporter.fail(&err);
    }

    if let Err(err) = backends
        .processes
        .start(&options.application_executable, "")
    {
        error!("failed to relaunch application: {err:#}");
    }
    transition(&mut phase, RunPhase::Relaunched);

    reporter.terminate();
    UpdateOutcome { phase, failure }
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    debug!(from = ?phase, to = ?next, "run phase transition");
    *phase = next;
}

fn prepare_run(staging_dir: &Path) -> Result<(UpdateManifest, ProgressState)> {
    let manifest = UpdateManifest::load_from_dir(staging_dir)?;
    let staged_files = count_staged_files(staging_dir)?;
    let state = ProgressState::plan(staged_files, &manifest.operations);
    Ok((manifest, state))
}
