use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

pub trait PackageArchive: Send + Sync {
    fn entry_names(&self) -> Result<Vec<String>>;
    fn extract_entry(&self, entry: &str, dest_dir: &Path) -> Result<()>;
}

pub struct ZipPackage {
    path: PathBuf,
}

impl ZipPackage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn entry_names_with_runner<CaptureCommand>(
        &self,
        mut capture: CaptureCommand,
    ) -> Result<Vec<String>>
    where
        CaptureCommand: FnMut(&mut Command, &str) -> Result<String>,
    {
        if cfg!(windows) {
            if let Ok(stdout) = capture(
                &mut build_ps_list_command(&self.path),
                "failed to list zip archive with powershell",
            ) {
                return Ok(parse_entry_lines(&stdout));
            }
        }

        if let Ok(stdout) = capture(
            &mut build_zip_list_command(&self.path),
            "failed to list zip archive with zipinfo",
        ) {
            return Ok(parse_entry_lines(&stdout));
        }

        let stdout = capture(
            &mut build_tar_list_command(&self.path),
            "failed to list zip archive with tar fallback",
        )?;
        Ok(parse_entry_lines(&stdout))
    }

    pub(crate) fn extract_entry_with_runner<RunCommand>(
        &self,
        entry: &str,
        dest_dir: &Path,
        mut run: RunCommand,
    ) -> Result<()>
    where
        RunCommand: FnMut(&mut Command, &str) -> Result<()>,
    {
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("failed to create {}", dest_dir.display()))?;
        if entry.ends_with('/') {
            let dir = dest_dir.join(entry.trim_end_matches('/'));
            return fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()));
        }
        if let Some(parent) = dest_dir.join(entry).parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        if cfg!(windows)
            && run(
                &mut build_ps_extract_entry_command(&self.path, entry, dest_dir),
                "failed to extract zip entry with powershell",
            )
            .is_ok()
        {
            return Ok(());
        }

        if run(
            &mut build_zip_extract_entry_command(&self.path, entry, dest_dir),
            "failed to extract zip entry with unzip",
        )
        .is_ok()
        {
            return Ok(());
        }

        run(
            &mut build_tar_extract_entry_command(&self.path, entry, dest_dir),
            "failed to extract zip entry with tar fallback",
        )
        .with_context(|| format!("failed to extract entry '{entry}'"))
    }
}

impl PackageArchive for ZipPackage {
    fn entry_names(&self) -> Result<Vec<String>> {
        self.entry_names_with_runner(run_command_capture)
    }

    fn extract_entry(&self, entry: &str, dest_dir: &Path) -> Result<()> {
        self.extract_entry_with_runner(entry, dest_dir, run_command)
    }
}

fn parse_entry_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn build_zip_list_command(archive_path: &Path) -> Command {
    let mut command = Command::new("zipinfo");
    command.arg("-1").arg(archive_path);
    command
}

pub(crate) fn build_tar_list_command(archive_path: &Path) -> Command {
    let mut command = Command::new("tar");
    command.arg("-tf").arg(archive_path);
    command
}

pub(crate) fn build_ps_list_command(archive_path: &Path) -> Command {
    let mut command = Command::new("powershell");
    command.arg("-NoProfile").arg("-Command").arg(format!(
        "[IO.Compression.ZipFile]::OpenRead('{}').Entries | ForEach-Object {{ $_.FullName }}",
        escape_ps_single_quote(archive_path)
    ));
    command
}

pub(crate) fn build_zip_extract_entry_command(
    archive_path: &Path,
    entry: &str,
    dest_dir: &Path,
) -> Command {
    let mut command = Command::new("unzip");
    command
        .arg("-o")
        .arg(archive_path)
        .arg(entry)
        .arg("-d")
        .arg(dest_dir);
    command
}

pub(crate) fn build_tar_extract_entry_command(
    archive_path: &Path,
    entry: &str,
    dest_dir: &Path,
) -> Command {
    let mut command = Command::new("tar");
    command
        .arg("-xf")
        .arg(archive_path)
        .arg("-C")
        .arg(dest_dir)
        .arg(entry);
    command
}

pub(crate) fn build_ps_extract_entry_command(
    archive_path: &Path,
    entry: &str,
    dest_dir: &Path,
) -> Command {
    let mut command = Command::new("powershell");
    command.arg("-NoProfile").arg("-Command").arg(format!(
        "$zip = [IO.Compression.ZipFile]::OpenRead('{}'); \
         [IO.Compression.ZipFileExtensions]::ExtractToFile($zip.GetEntry('{}'), '{}', $true); \
         $zip.Dispose()",
        escape_ps_single_quote(archive_path),
        entry.replace('\'', "''"),
        escape_ps_single_quote(&dest_dir.join(entry))
    ));
    command
}

fn escape_ps_single_quote(path: &Path) -> String {
    path.as_os_str().to_string_lossy().replace('\'', "''")
}

pub(crate) fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    run_command_capture(command, context_message).map(|_| ())
}

pub(crate) fn run_command_capture(command: &mut Command, context_message: &str) -> Result<String> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}

pub(crate) fn error_chain_has_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    })
}
