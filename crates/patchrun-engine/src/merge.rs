use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use patchrun_core::{ProgressState, RootToken, Roots};
use tracing::{debug, error};

use crate::reporter::ProgressReporter;

pub(crate) fn count_staged_files(staging_dir: &Path) -> Result<u64> {
    let mut count = 0;
    for token in RootToken::ALL {
        let folder = staging_dir.join(token.as_str());
        if folder.is_dir() {
            count += count_files_recursive(&folder)?;
        }
    }
    Ok(count)
}

fn count_files_recursive(dir: &Path) -> Result<u64> {
    let mut count = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if entry
            .file_type()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?
            .is_dir()
        {
            count += count_files_recursive(&entry.path())?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}

// Merge failures never feed the fail/terminate decision.
pub(crate) fn merge_staged_folders(
    staging_dir: &Path,
    roots: &Roots,
    state: &mut ProgressState,
    reporter: &dyn ProgressReporter,
) {
    for token in RootToken::ALL {
        let source = staging_dir.join(token.as_str());
        if !source.is_dir() {
            continue;
        }

        let destination = roots.resolve(token);
        debug!(
            folder = token.as_str(),
            destination = %destination.display(),
            "merging staged folder"
        );
        if let Err(err) = merge_directory(&source, destination, state, reporter) {
            error!(folder = token.as_str(), "merge failed: {err:#}");
        }
    }
}

fn merge_directory(
    source: &Path,
    destination: &Path,
    state: &mut ProgressState,
    reporter: &dyn ProgressReporter,
) -> Result<()> {
    fs::create_dir_all(destination)
        .with_context(|| format!("failed to create {}", destination.display()))?;

    let mut files = Vec::new();
    let mut directories = Vec::new();
    for entry in
        fs::read_dir(source).with_context(|| format!("failed to read {}", source.display()))?
    {
        let entry = entry?;
        if entry
            .file_type()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?
            .is_dir()
        {
            directories.push(entry);
        } else {
            files.push(entry);
        }
    }

    for file in files {
        let file_name = file.file_name();
        let percentage = state.advance();
        reporter.report_unpacking_progress(percentage, &file_name.to_string_lossy());

        let target = destination.join(&file_name);
        copy_file(&file.path(), &target)?;
    }

    for directory in directories {
        let target = destination.join(directory.file_name());
        merge_directory(&directory.path(), &target, state, reporter)?;
    }

    Ok(())
}

fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::io;

        let metadata = fs::symlink_metadata(source)
            .with_context(|| format!("failed to stat {}", source.display()))?;
        if metadata.file_type().is_symlink() {
            let link_target = fs::read_link(source)
                .with_context(|| format!("failed to read symlink {}", source.display()))?;
            match fs::remove_file(destination) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("failed to replace {}", destination.display())
                    });
                }
            }
            return std::os::unix::fs::symlink(&link_target, destination).with_context(|| {
                format!(
                    "failed to create symlink {} -> {}",
                    destination.display(),
                    link_target.display()
                )
            });
        }
    }

    fs::copy(source, destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}
