use std::process::Command;

use anyhow::Result;
use tracing::debug;

use crate::archive::run_command;

pub trait ServiceController: Send {
    fn start(&mut self, name: &str, arguments: &[String]) -> Result<()>;
    fn stop(&mut self, name: &str) -> Result<()>;
}

pub struct SystemServiceController;

impl ServiceController for SystemServiceController {
    fn start(&mut self, name: &str, arguments: &[String]) -> Result<()> {
        debug!(name, ?arguments, "starting service");
        run_command(
            &mut build_service_start_command(name, arguments),
            "failed to start service",
        )
    }

    fn stop(&mut self, name: &str) -> Result<()> {
        debug!(name, "stopping service");
        run_command(
            &mut build_service_stop_command(name),
            "failed to stop service",
        )
    }
}

#[cfg(windows)]
pub(crate) fn build_service_start_command(name: &str, arguments: &[String]) -> Command {
    let mut command = Command::new("sc");
    command.arg("start").arg(name);
    command.args(arguments);
    command
}

#[cfg(not(windows))]
pub(crate) fn build_service_start_command(name: &str, arguments: &[String]) -> Command {
    // Start arguments only apply to the Windows service manager.
    let _ = arguments;
    let mut command = Command::new("systemctl");
    command.arg("start").arg(name);
    command
}

#[cfg(windows)]
pub(crate) fn build_service_stop_command(name: &str) -> Command {
    let mut command = Command::new("sc");
    command.arg("stop").arg(name);
    command
}

#[cfg(not(windows))]
pub(crate) fn build_service_stop_command(name: &str) -> Command {
    let mut command = Command::new("systemctl");
    command.arg("stop").arg(name);
    command
}
