//! Isolated environment (virtualenv) management.

use std::path::{Path, PathBuf};

use crate::error::{ComfyupError, Result};
use crate::shell::ProcessCommand;
use crate::state::{Step, StepMarker};
use crate::ui::UserInterface;

use super::ProvisionContext;

/// A usable virtual environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxHandle {
    pub path: PathBuf,
    /// Interpreter inside the environment.
    pub python: PathBuf,
}

impl SandboxHandle {
    pub fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            python: crate::sys::venv_python(path),
        }
    }
}

/// Create the virtual environment, or reuse a completed one.
pub fn ensure_sandbox(
    ctx: &ProvisionContext<'_>,
    ui: &mut dyn UserInterface,
) -> Result<SandboxHandle> {
    let handle = SandboxHandle::at(&ctx.config.sandbox_path);

    if !handle.path.exists() {
        create(ctx, ui, &handle, false)?;
        return Ok(handle);
    }

    if ctx.trusts_existing() || ctx.markers.exists(Step::Sandbox) {
        ui.info("Virtual environment already exists.");
        return Ok(handle);
    }

    if interpreter_runs(ctx, &handle.python) {
        ui.info(&format!(
            "Adopting existing virtual environment at {}",
            handle.path.display()
        ));
        write_marker(ctx, &handle)?;
        return Ok(handle);
    }

    ui.warning(&format!(
        "Virtual environment at {} is incomplete; recreating it.",
        handle.path.display()
    ));
    create(ctx, ui, &handle, true)?;
    Ok(handle)
}

fn create(
    ctx: &ProvisionContext<'_>,
    ui: &mut dyn UserInterface,
    handle: &SandboxHandle,
    clear: bool,
) -> Result<()> {
    ui.info("Creating virtual environment...");

    let mut command = ProcessCommand::new(&ctx.config.python).args(["-m", "venv"]);
    if clear {
        command = command.arg("--clear");
    }
    let command = command.arg(&handle.path).captured();

    let failed = |message: String| ComfyupError::SandboxCreation {
        path: handle.path.clone(),
        message,
    };
    let result = ctx.runner.run(&command).map_err(|e| failed(e.to_string()))?;
    if !result.success {
        return Err(failed(result.diagnostic()));
    }

    write_marker(ctx, handle)
}

fn interpreter_runs(ctx: &ProvisionContext<'_>, python: &Path) -> bool {
    let command = ProcessCommand::new(python)
        .args(["-c", "import sys"])
        .captured();
    ctx.runner.run(&command).is_ok_and(|r| r.success)
}

fn write_marker(ctx: &ProvisionContext<'_>, handle: &SandboxHandle) -> Result<()> {
    ctx.markers.write(
        &StepMarker::now(Step::Sandbox).with_detail(handle.python.display().to_string()),
    )
}
