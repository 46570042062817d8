//! Acceleration profile probe.
//!
//! The probe script runs inside the sandbox interpreter, so it sees exactly
//! the torch build ComfyUI will import. It prints one JSON object on its last
//! line of output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shell::{CommandRunner, ProcessCommand};

/// Inline script passed to `python -c`.
pub const PROBE_SCRIPT: &str = "\
import json, torch
available = bool(torch.cuda.is_available())
print(json.dumps({
    'torch': torch.__version__,
    'cuda': torch.version.cuda,
    'available': available,
    'device': torch.cuda.get_device_name(0) if available else None,
}))
";

/// The torch build installed in the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccelerationProfile {
    /// `torch.__version__`.
    #[serde(rename = "torch")]
    pub library_version: String,

    /// `torch.version.cuda`; absent on CPU-only builds.
    #[serde(rename = "cuda", default)]
    pub accelerator_runtime_version: Option<String>,

    /// `torch.cuda.is_available()`.
    #[serde(rename = "available", default)]
    pub accelerator_available: bool,

    /// Name of device 0 when available.
    #[serde(rename = "device", default)]
    pub device_name: Option<String>,
}

impl AccelerationProfile {
    /// Parse the probe output, using the last non-empty line.
    ///
    /// torch sometimes prints deprecation notices to stdout before the
    /// script's own output.
    pub fn from_probe_output(stdout: &str) -> Result<Self, serde_json::Error> {
        let line = stdout
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("");
        serde_json::from_str(line.trim())
    }

    /// A CPU-only profile, mostly useful in tests.
    pub fn cpu_only(library_version: impl Into<String>) -> Self {
        Self {
            library_version: library_version.into(),
            accelerator_runtime_version: None,
            accelerator_available: false,
            device_name: None,
        }
    }

    /// A CUDA-enabled profile, mostly useful in tests.
    pub fn cuda(
        library_version: impl Into<String>,
        cuda: impl Into<String>,
        device: Option<&str>,
    ) -> Self {
        Self {
            library_version: library_version.into(),
            accelerator_runtime_version: Some(cuda.into()),
            accelerator_available: device.is_some(),
            device_name: device.map(str::to_string),
        }
    }
}

/// Result of running the acceleration probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The probe ran and reported a profile.
    Available(AccelerationProfile),
    /// torch could not be imported or the probe output was unusable.
    Unavailable { reason: String },
}

/// Probe the torch build inside the sandbox.
///
/// Never fails: every problem becomes [`ProbeOutcome::Unavailable`].
pub fn probe_acceleration(runner: &dyn CommandRunner, sandbox_python: &Path) -> ProbeOutcome {
    let command = ProcessCommand::new(sandbox_python)
        .args(["-c", PROBE_SCRIPT])
        .captured();

    let result = match runner.run(&command) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Acceleration probe could not start: {}", e);
            return ProbeOutcome::Unavailable {
                reason: e.to_string(),
            };
        }
    };

    if !result.success {
        let reason = last_line(&result.diagnostic());
        tracing::warn!("Acceleration probe failed: {}", reason);
        return ProbeOutcome::Unavailable { reason };
    }

    match AccelerationProfile::from_probe_output(&result.stdout) {
        Ok(profile) => ProbeOutcome::Available(profile),
        Err(e) => {
            tracing::warn!("Acceleration probe printed unexpected output: {}", e);
            ProbeOutcome::Unavailable {
                reason: format!("unexpected probe output: {}", e),
            }
        }
    }
}

/// The final line of a traceback carries the exception.
fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}
