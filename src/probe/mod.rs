//! Read-only environment probing.
//!
//! Two probes feed the bootstrap:
//!
//! - [`probe_runtime_version`] asks the host interpreter for its version so
//!   the runtime gate can stop before anything is written to disk
//! - [`probe_acceleration`] runs a short script inside the sandbox
//!   interpreter and reports the installed torch build
//!
//! Neither probe has side effects. An acceleration probe failure is expected
//! before the first install and is returned as [`ProbeOutcome::Unavailable`]
//! rather than an error.

pub mod acceleration;
pub mod runtime;

pub use acceleration::{probe_acceleration, AccelerationProfile, ProbeOutcome};
pub use runtime::{probe_runtime_version, RuntimeVersion};
