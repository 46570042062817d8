//! Idempotent provisioning steps.
//!
//! Each step can run against any prior state: nothing there yet, a previous
//! successful run, or the leftovers of an interrupted one. In marker mode a
//! step is skipped only when its completion marker exists; in existence mode
//! the directory alone is trusted.

pub mod installer;
pub mod sandbox;
pub mod source;

pub use installer::install_dependencies;
pub use sandbox::{ensure_sandbox, SandboxHandle};
pub use source::{ensure_source, SourceCheckout};

use crate::config::{Idempotency, LauncherConfig};
use crate::shell::CommandRunner;
use crate::state::MarkerStore;

/// Everything a provisioning step needs.
pub struct ProvisionContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: &'a LauncherConfig,
    pub markers: MarkerStore,
}

impl<'a> ProvisionContext<'a> {
    /// Build a context whose markers live under `config.state_dir`.
    pub fn new(runner: &'a dyn CommandRunner, config: &'a LauncherConfig) -> Self {
        Self {
            runner,
            config,
            markers: MarkerStore::new(&config.state_dir),
        }
    }

    /// Whether an existing directory is trusted without a marker.
    pub fn trusts_existing(&self) -> bool {
        self.config.idempotency == Idempotency::Existence
    }
}
