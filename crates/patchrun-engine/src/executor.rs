use std::fs;

use anyhow::{anyhow, Context, Result};
use patchrun_core::{Operation, OperationKind, ProgressState, Roots};
use serde_json::Value;
use tracing::debug;

use crate::reporter::ProgressReporter;
use crate::runner::EngineBackends;

pub(crate) fn apply_operations(
    operations: &[Operation],
    roots: &Roots,
    state: &mut ProgressState,
    backends: &mut EngineBackends,
    reporter: &dyn ProgressReporter,
) -> Result<()> {
    for operation in operations {
        apply_operation(operation, roots, state, backends, reporter).with_context(|| {
            format!(
                "operation {}/{} on '{}' failed",
                operation.area.as_str(),
                operation.method.as_str(),
                operation.target
            )
        })?;
    }
    Ok(())
}

fn apply_operation(
    operation: &Operation,
    roots: &Roots,
    state: &mut ProgressState,
    backends: &mut EngineBackends,
    reporter: &dyn ProgressReporter,
) -> Result<()> {
    match &operation.kind {
        OperationKind::DeleteFiles { files } => {
            let base = roots.resolve_target(&operation.target)?;
            for file in files {
                let percentage = state.advance();
                reporter.report_operation_progress(percentage, &format!("Deleting {file}..."));
                let path = base.join(file);
                fs::remove_file(&path)
                    .with_context(|| format!("failed to delete {}", path.display()))?;
            }
        }
        OperationKind::RenameFile { new_name } => {
            let percentage = state.advance();
            reporter.report_operation_progress(
                percentage,
                &format!("Renaming {} to {new_name}...", operation.target),
            );
            let source = roots.resolve_target(&operation.target)?;
            let parent = source
                .parent()
                .ok_or_else(|| anyhow!("rename source has no parent: {}", source.display()))?;
            let destination = parent.join(new_name);
            fs::rename(&source, &destination).with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    source.display(),
                    destination.display()
                )
            })?;
        }
        OperationKind::CreateSubKeys { sub_keys } => {
            for sub_key in sub_keys {
                let percentage = state.advance();
                reporter.report_operation_progress(
                    percentage,
                    &format!("Creating registry subkey {sub_key}..."),
                );
                backends.store.create_sub_key(&operation.target, sub_key)?;
            }
        }
        OperationKind::DeleteSubKeys { sub_keys } => {
            for sub_key in sub_keys {
                let percentage = state.advance();
                reporter.report_operation_progress(
                    percentage,
                    &format!("Deleting registry subkey {sub_key}..."),
                );
                backends.store.delete_sub_key(&operation.target, sub_key)?;
            }
        }
        OperationKind::SetValues { entries } => {
            for entry in entries {
                let percentage = state.advance();
                reporter.report_operation_progress(
                    percentage,
                    &format!(
                        "Setting {} to {}...",
                        entry.name,
                        display_value(&entry.value)
                    ),
                );
                backends
                    .store
                    .set_value(&operation.target, &entry.name, &entry.value, entry.kind)?;
            }
        }
        OperationKind::DeleteValues { names } => {
            for name in names {
                let percentage = state.advance();
                reporter
                    .report_operation_progress(percentage, &format!("Deleting value {name}..."));
                backends.store.delete_value(&operation.target, name)?;
            }
        }
        OperationKind::StartProcess { arguments } => {
            let percentage = state.advance();
            reporter.report_operation_progress(
                percentage,
                &format!("Starting {}...", operation.target),
            );
            let executable = roots.resolve_target(&operation.target)?;
            backends.processes.start(&executable, arguments)?;
        }
        OperationKind::StopProcess => {
            let percentage = state.advance();
            reporter.report_operation_progress(
                percentage,
                &format!("Stopping {}...", operation.target),
            );
            backends.processes.stop_by_name(&operation.target)?;
        }
        OperationKind::StartService { arguments } => {
            let percentage = state.advance();
            reporter.report_operation_progress(
                percentage,
                &format!("Starting service {}...", operation.target),
            );
            backends.services.start(&operation.target, arguments)?;
        }
        OperationKind::StopService => {
            let percentage = state.advance();
            reporter.report_operation_progress(
                percentage,
                &format!("Stopping service {}...", operation.target),
            );
            backends.services.stop(&operation.target)?;
        }
        OperationKind::Unsupported => {
            debug!(
                area = operation.area.as_str(),
                method = operation.method.as_str(),
                target = operation.target,
                "skipping unsupported operation"
            );
        }
    }
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
