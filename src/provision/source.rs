//! Application source checkout.
//!
//! An existing checkout is never updated and never deleted. A directory that
//! is neither marked nor a git work tree stops the run so the operator can
//! decide what to do with it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ComfyupError, Result};
use crate::shell::ProcessCommand;
use crate::state::{Step, StepMarker};
use crate::ui::UserInterface;

use super::ProvisionContext;

/// A checkout of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCheckout {
    pub path: PathBuf,
    /// Dependency manifest inside the checkout.
    pub manifest: PathBuf,
}

/// Clone the repository, or reuse an existing checkout.
pub fn ensure_source(
    ctx: &ProvisionContext<'_>,
    ui: &mut dyn UserInterface,
) -> Result<SourceCheckout> {
    let path = ctx.config.checkout_path.clone();
    let checkout = SourceCheckout {
        manifest: path.join(&ctx.config.requirements_file),
        path,
    };

    if !checkout.path.exists() {
        clone(ctx, ui, &checkout.path)?;
        return Ok(checkout);
    }

    if ctx.trusts_existing() || ctx.markers.exists(Step::Source) {
        ui.info("ComfyUI folder already exists. Skipping clone.");
        return Ok(checkout);
    }

    if is_empty_dir(&checkout.path) {
        clone(ctx, ui, &checkout.path)?;
        return Ok(checkout);
    }

    if is_work_tree(ctx, &checkout.path) {
        ui.info(&format!(
            "Adopting existing checkout at {}",
            checkout.path.display()
        ));
        ctx.markers.write(
            &StepMarker::now(Step::Source).with_detail(checkout.path.display().to_string()),
        )?;
        return Ok(checkout);
    }

    Err(ComfyupError::IncompleteCheckout {
        path: checkout.path,
    })
}

fn clone(ctx: &ProvisionContext<'_>, ui: &mut dyn UserInterface, path: &Path) -> Result<()> {
    let config = ctx.config;
    ui.info("Cloning ComfyUI repository...");

    let mut command = ProcessCommand::new("git").arg("clone");
    if let Some(depth) = config.clone_depth {
        command = command.args(["--depth", depth.to_string().as_str()]);
    }
    if let Some(r) = &config.repository_ref {
        command = command.args(["--branch", r.as_str()]);
    }
    let command = command
        .arg(&config.repository_url)
        .arg(path)
        .captured();

    let failed = |message: String| ComfyupError::CloneFailed {
        url: config.repository_url.clone(),
        message,
    };
    let result = ctx.runner.run(&command).map_err(|e| failed(e.to_string()))?;
    if !result.success {
        return Err(failed(result.diagnostic()));
    }

    let detail = match &config.repository_ref {
        Some(r) => format!("{}@{}", config.repository_url, r),
        None => config.repository_url.clone(),
    };
    ctx.markers
        .write(&StepMarker::now(Step::Source).with_detail(detail))
}

fn is_work_tree(ctx: &ProvisionContext<'_>, path: &Path) -> bool {
    let command = ProcessCommand::new("git")
        .arg("-C")
        .arg(path)
        .args(["rev-parse", "--verify", "HEAD"])
        .captured();
    ctx.runner.run(&command).is_ok_and(|r| r.success)
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}
