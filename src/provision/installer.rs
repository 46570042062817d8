//! Dependency installation into the sandbox.
//!
//! Both pip invocations run on every bootstrap; pip itself is idempotent.
//! Output is streamed to the operator rather than captured.

use crate::error::{ComfyupError, Result};
use crate::shell::ProcessCommand;
use crate::state::{file_sha256, Step, StepMarker};
use crate::ui::UserInterface;

use super::{ProvisionContext, SandboxHandle, SourceCheckout};

/// Upgrade pip, then install the checkout's requirements.
pub fn install_dependencies(
    ctx: &ProvisionContext<'_>,
    ui: &mut dyn UserInterface,
    sandbox: &SandboxHandle,
    checkout: &SourceCheckout,
) -> Result<()> {
    if !checkout.manifest.is_file() {
        return Err(ComfyupError::ManifestMissing {
            path: checkout.manifest.clone(),
        });
    }

    let digest = file_sha256(&checkout.manifest)?;
    if let Some(previous) = ctx
        .markers
        .load(Step::Dependencies)
        .and_then(|m| m.manifest_sha256)
    {
        if previous != digest {
            ui.info("Dependency manifest changed since the last install.");
        }
    }

    ui.info("Upgrading pip...");
    pip(
        ctx,
        "upgrade pip",
        ProcessCommand::new(&sandbox.python).args(["-m", "pip", "install", "--upgrade", "pip"]),
    )?;

    ui.info("Installing ComfyUI dependencies...");
    pip(
        ctx,
        "install requirements",
        ProcessCommand::new(&sandbox.python)
            .args(["-m", "pip", "install", "-r"])
            .arg(&checkout.manifest)
            .args(&ctx.config.pip_args),
    )?;

    ctx.markers.write(
        &StepMarker::now(Step::Dependencies)
            .with_detail(checkout.manifest.display().to_string())
            .with_manifest_hash(digest),
    )?;

    ui.info("Dependencies installed.");
    Ok(())
}

fn pip(ctx: &ProvisionContext<'_>, step: &str, command: ProcessCommand) -> Result<()> {
    let result = ctx.runner.run(&command).map_err(|e| {
        tracing::warn!("Could not start {}: {}", command, e);
        ComfyupError::InstallFailed {
            step: step.to_string(),
            code: None,
        }
    })?;

    if result.success {
        Ok(())
    } else {
        Err(ComfyupError::InstallFailed {
            step: step.to_string(),
            code: result.exit_code,
        })
    }
}
