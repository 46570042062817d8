//! Compatibility verification.
//!
//! [`verify`] turns an [`AccelerationProfile`] into a [`CompatibilityReport`].
//! The verdict is informational: even a CPU-only build can run ComfyUI, just
//! slowly. The only error is a CUDA version string that is not
//! `<major>.<minor>`, which means the probe itself is broken.

pub mod cuda;
pub mod report;

pub use cuda::CudaVersion;
pub use report::render_check;

use std::str::FromStr;

use crate::error::Result;
use crate::probe::AccelerationProfile;

/// Verdict for a torch build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatibilityVerdict {
    /// Built against a CUDA version on the allow-list.
    Supported,
    /// Built against CUDA, but a version that is not commonly tested.
    UnverifiedButUsable,
    /// No CUDA support compiled in.
    CpuOnly,
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityReport {
    pub verdict: CompatibilityVerdict,
    /// Parsed CUDA version, when one is compiled in.
    pub cuda: Option<CudaVersion>,
    /// Operator-facing warnings, in display order.
    pub warnings: Vec<String>,
}

/// Classify a torch build against `allow_list`.
pub fn verify(
    profile: &AccelerationProfile,
    allow_list: &[CudaVersion],
) -> Result<CompatibilityReport> {
    let Some(raw) = profile.accelerator_runtime_version.as_deref() else {
        return Ok(CompatibilityReport {
            verdict: CompatibilityVerdict::CpuOnly,
            cuda: None,
            warnings: vec![
                "This is a CPU-only PyTorch build. ComfyUI will run slowly on CPU.".to_string(),
                "Install the CUDA-enabled PyTorch wheel and a compatible NVIDIA driver for GPU acceleration."
                    .to_string(),
            ],
        });
    };

    let cuda = CudaVersion::from_str(raw)?;
    let mut warnings = Vec::new();

    let verdict = if allow_list.contains(&cuda) {
        CompatibilityVerdict::Supported
    } else {
        warnings.push(format!("CUDA {} is not a commonly tested build.", cuda));
        warnings.push("It may still work, but compatibility is not guaranteed.".to_string());
        CompatibilityVerdict::UnverifiedButUsable
    };

    if !profile.accelerator_available {
        warnings.push("CUDA is NOT available.".to_string());
        warnings.push("ComfyUI will run on CPU (slow).".to_string());
        warnings.push("Check that you installed the CUDA-enabled PyTorch wheel.".to_string());
        warnings.push("Check that you have compatible NVIDIA drivers installed.".to_string());
    }

    Ok(CompatibilityReport {
        verdict,
        cuda: Some(cuda),
        warnings,
    })
}
