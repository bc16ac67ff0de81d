use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::archive::error_chain_has_not_found;

pub trait ProcessController: Send {
    fn start(&mut self, executable: &Path, arguments: &str) -> Result<()>;

    fn stop_by_name(&mut self, name: &str) -> Result<()>;
}

pub struct SystemProcessController;

impl ProcessController for SystemProcessController {
    fn start(&mut self, executable: &Path, arguments: &str) -> Result<()> {
        debug!(executable = %executable.display(), arguments, "starting process");
        let mut command = Command::new(executable);
        command.args(split_arguments(arguments));
        command
            .spawn()
            .with_context(|| format!("failed to start {}", executable.display()))?;
        Ok(())
    }

    fn stop_by_name(&mut self, name: &str) -> Result<()> {
        debug!(name, "stopping processes by name");
        let mut command = build_stop_command(name);
        let output = command
            .output()
            .map_err(anyhow::Error::from)
            .map_err(|err| {
                if error_chain_has_not_found(&err) {
                    return anyhow!(
                        "failed to stop processes named '{name}': kill tool not found on PATH"
                    );
                }
                err.context(format!("failed to stop processes named '{name}'"))
            })?;

        if output.status.success() || no_processes_matched(&output.status, &output.stderr) {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!(
            "failed to stop processes named '{name}': status={} stderr='{}'",
            output.status,
            stderr.trim()
        ))
    }
}

pub(crate) fn split_arguments(arguments: &str) -> Vec<String> {
    arguments
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(windows)]
pub(crate) fn build_stop_command(name: &str) -> Command {
    let mut command = Command::new("taskkill");
    command.arg("/F").arg("/IM").arg(format!("{name}.exe"));
    command
}

#[cfg(not(windows))]
pub(crate) fn build_stop_command(name: &str) -> Command {
    let mut command = Command::new("pkill");
    command.arg("-x").arg(name);
    command
}

#[cfg(windows)]
fn no_processes_matched(status: &std::process::ExitStatus, stderr: &[u8]) -> bool {
    let _ = status;
    String::from_utf8_lossy(stderr)
        .to_ascii_lowercase()
        .contains("not found")
}

#[cfg(not(windows))]
fn no_processes_matched(status: &std::process::ExitStatus, stderr: &[u8]) -> bool {
    // pkill exits 1 when no process matched.
    let _ = stderr;
    status.code() == Some(1)
}
