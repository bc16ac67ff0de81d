use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use crate::archive::PackageArchive;
use crate::reporter::ProgressReporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtractionStatus {
    Completed,
    Stopped,
}

pub(crate) fn extract_package(
    archive: &dyn PackageArchive,
    staging_dir: &Path,
    reporter: &dyn ProgressReporter,
) -> ExtractionStatus {
    let entries = match archive
        .entry_names()
        .context("failed to read package contents")
    {
        Ok(entries) => entries,
        Err(err) => {
            if reporter.fail(&err) {
                reporter.terminate();
                return ExtractionStatus::Stopped;
            }
            return ExtractionStatus::Completed;
        }
    };

    debug!(count = entries.len(), "extracting package entries");
    for entry in &entries {
        if let Err(err) = archive
            .extract_entry(entry, staging_dir)
            .with_context(|| format!("failed to extract package entry '{entry}'"))
        {
            warn!(entry, "package entry extraction failed");
            if reporter.fail(&err) {
                reporter.terminate();
                return ExtractionStatus::Stopped;
            }
            break;
        }
    }

    ExtractionStatus::Completed
}
