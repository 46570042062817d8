//! Error types for comfyup operations.
//!
//! This module defines [`ComfyupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal conditions are `ComfyupError` variants and propagate with `?` up to
//!   the command dispatcher, which maps them to an exit code
//! - Advisory conditions (CPU-only builds, untested CUDA versions, a sandbox
//!   without torch yet) are never errors; they are reported as warnings
//! - Use `anyhow::Error` (via `ComfyupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for comfyup operations.
#[derive(Debug, Error)]
pub enum ComfyupError {
    /// The host interpreter is not Python 3.10+.
    #[error("Python 3.10+ is required (found {major}.{minor})")]
    UnsupportedRuntime { major: u32, minor: u32 },

    /// The host interpreter could not be executed at all.
    #[error("Python interpreter '{interpreter}' could not be run: {message}")]
    RuntimeNotFound {
        interpreter: String,
        message: String,
    },

    /// The interpreter ran but its version banner was not recognized.
    #[error("Could not parse Python version from '{output}'")]
    RuntimeVersionUnparsed { output: String },

    /// Creating the isolated environment failed.
    #[error("Failed to create virtual environment at {path}: {message}")]
    SandboxCreation { path: PathBuf, message: String },

    /// Cloning the application repository failed.
    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// A checkout directory exists but was never completed and is not a git work tree.
    #[error("{path} exists but is not a complete checkout; remove it and re-run")]
    IncompleteCheckout { path: PathBuf },

    /// The checkout has no dependency manifest.
    #[error("Dependency manifest not found: {path}")]
    ManifestMissing { path: PathBuf },

    /// A package installation step failed.
    #[error("Dependency installation failed during '{step}' (exit code {code:?})")]
    InstallFailed { step: String, code: Option<i32> },

    /// The application process could not be started.
    #[error("Failed to start {command}: {message}")]
    SpawnFailed { command: String, message: String },

    /// The application did not accept connections within the readiness window.
    #[error("Timed out after {waited_secs}s waiting for {address} to accept connections")]
    TimedOutWaitingForReadiness { address: String, waited_secs: u64 },

    /// The application exited before it started listening.
    #[error("Application exited with code {code:?} before {address} became ready")]
    ExitedBeforeReady { address: String, code: Option<i32> },

    /// The numeric library reported a CUDA version that is not `<major>.<minor>`.
    #[error("Unrecognized CUDA version format: '{value}'")]
    InvalidAcceleratorVersion { value: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Broad classification of an error, used to pick exit codes and banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The host cannot run the application at all. Nothing was touched.
    FatalPrecondition,
    /// A provisioning step failed; the filesystem may be partially written.
    FatalProvisioning,
    /// The configuration could not be loaded or is invalid.
    Configuration,
    /// The application was spawned but never became reachable.
    Readiness,
    /// Probe output violated its format contract.
    Defect,
}

impl ComfyupError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedRuntime { .. }
            | Self::RuntimeNotFound { .. }
            | Self::RuntimeVersionUnparsed { .. } => ErrorCategory::FatalPrecondition,
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::TimedOutWaitingForReadiness { .. } | Self::ExitedBeforeReady { .. } => {
                ErrorCategory::Readiness
            }
            Self::InvalidAcceleratorVersion { .. } => ErrorCategory::Defect,
            Self::SandboxCreation { .. }
            | Self::CloneFailed { .. }
            | Self::IncompleteCheckout { .. }
            | Self::ManifestMissing { .. }
            | Self::InstallFailed { .. }
            | Self::SpawnFailed { .. }
            | Self::Io(_)
            | Self::Other(_) => ErrorCategory::FatalProvisioning,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Readiness => 3,
            ErrorCategory::FatalPrecondition
            | ErrorCategory::FatalProvisioning
            | ErrorCategory::Defect => 1,
        }
    }
}

/// Result type alias for comfyup operations.
pub type Result<T> = std::result::Result<T, ComfyupError>;
