//! The compatibility phase as operators see it.

use crate::error::Result;
use crate::probe::{ProbeOutcome, RuntimeVersion};
use crate::ui::UserInterface;

use super::{verify, CompatibilityReport, CompatibilityVerdict, CudaVersion};

/// Title of the compatibility banner.
pub const CHECK_TITLE: &str = "SYSTEM COMPATIBILITY CHECK";

/// Render the compatibility phase and return the report.
///
/// Returns `Ok(None)` when the probe was unavailable, and the
/// [`verify`] error when the reported CUDA version is malformed. The phase
/// always closes with exactly one of `[OK]`, `[WARNING]`, or `[FAILED]`.
pub fn render_check(
    ui: &mut dyn UserInterface,
    runtime: Option<RuntimeVersion>,
    outcome: &ProbeOutcome,
    allow_list: &[CudaVersion],
) -> Result<Option<CompatibilityReport>> {
    ui.banner(CHECK_TITLE);
    if let Some(version) = runtime {
        ui.info(&format!("Python version detected: {}", version));
    }
    ui.info("Checking PyTorch & CUDA inside the venv...");

    let profile = match outcome {
        ProbeOutcome::Available(profile) => profile,
        ProbeOutcome::Unavailable { reason } => {
            ui.warning("Could not import torch inside the venv yet.");
            ui.warning(&format!("Exception: {}", reason));
            ui.warning("This is normal BEFORE first install.");
            close(ui, |ui| ui.warning("Compatibility could not be determined."));
            return Ok(None);
        }
    };

    ui.info(&format!("PyTorch version: {}", profile.library_version));
    ui.info(&format!(
        "CUDA built-in version: {}",
        profile.accelerator_runtime_version.as_deref().unwrap_or("None")
    ));
    ui.info(&format!("CUDA available: {}", profile.accelerator_available));
    if let Some(device) = &profile.device_name {
        ui.info(&format!("GPU detected: {}", device));
    }

    let report = match verify(profile, allow_list) {
        Ok(report) => report,
        Err(e) => {
            ui.error(&e.to_string());
            close(ui, |ui| ui.failed("Compatibility check failed."));
            return Err(e);
        }
    };

    if let (CompatibilityVerdict::Supported, Some(cuda)) = (report.verdict, report.cuda) {
        ui.info(&format!("PyTorch was built with CUDA {}", cuda));
        ui.info("CUDA version is in a supported range.");
    }
    for warning in &report.warnings {
        ui.warning(warning);
    }

    close(ui, |ui| ui.ok("System compatibility validated."));
    Ok(Some(report))
}

fn close(ui: &mut dyn UserInterface, last: impl FnOnce(&mut dyn UserInterface)) {
    ui.separator();
    last(ui);
    ui.separator();
}
