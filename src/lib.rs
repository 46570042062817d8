//! comfyup - One-shot installer and launcher for ComfyUI.
//!
//! comfyup provisions a Python virtual environment, clones ComfyUI, installs
//! its dependencies, checks the installed PyTorch build against known-good
//! CUDA versions, and starts the server. Every step is safe to re-run: work
//! that already completed is skipped through completion markers.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`compat`] - CUDA compatibility verification
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`launcher`] - Application launch and readiness polling
//! - [`probe`] - Interpreter and PyTorch probes
//! - [`provision`] - Virtual environment, checkout, and dependency steps
//! - [`runner`] - Bootstrap orchestration
//! - [`shell`] - Process execution
//! - [`state`] - Completion markers
//! - [`ui`] - Severity-prefixed terminal output
//!
//! # Example
//!
//! ```
//! use comfyup::compat::{verify, CompatibilityVerdict, CudaVersion};
//! use comfyup::probe::AccelerationProfile;
//!
//! let profile = AccelerationProfile::cuda("2.3.0+cu121", "12.1", Some("RTX 4090"));
//! let report = verify(&profile, &CudaVersion::default_allow_list()).unwrap();
//! assert_eq!(report.verdict, CompatibilityVerdict::Supported);
//! ```
//!
//! For end-to-end bootstrap scenarios, see the integration tests.

pub mod cli;
pub mod compat;
pub mod config;
pub mod error;
pub mod launcher;
pub mod probe;
pub mod provision;
pub mod runner;
pub mod shell;
pub mod state;
pub mod sys;
pub mod ui;

pub use error::{ComfyupError, Result};
