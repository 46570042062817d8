//! Check command implementation.
//!
//! The `comfyup check` command runs the system compatibility check against
//! the existing virtual environment without provisioning anything.

use crate::config::LauncherConfig;
use crate::error::{ErrorCategory, Result};
use crate::runner::Bootstrap;
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    config: LauncherConfig,
    runner: Box<dyn CommandRunner>,
}

impl CheckCommand {
    /// Create a check command that executes real processes.
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Create a check command with a custom runner.
    pub fn with_runner(config: LauncherConfig, runner: Box<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match Bootstrap::new(&self.config, self.runner.as_ref()).check(ui) {
            Ok(_) => Ok(CommandResult::success()),
            // Already reported inside the check banner.
            Err(e) if e.category() == ErrorCategory::Defect => Ok(CommandResult::failure(1)),
            Err(e) => Err(e),
        }
    }
}
