//! Run command implementation.
//!
//! The `comfyup run` command (also the default) provisions the environment
//! and launches ComfyUI.

use crate::config::LauncherConfig;
use crate::error::Result;
use crate::runner::Bootstrap;
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    config: LauncherConfig,
    runner: Box<dyn CommandRunner>,
}

impl RunCommand {
    /// Create a run command that executes real processes.
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Create a run command with a custom runner.
    pub fn with_runner(config: LauncherConfig, runner: Box<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let outcome = Bootstrap::new(&self.config, self.runner.as_ref()).run(ui)?;
        tracing::info!(
            "Bootstrap finished in {:.1}s; ComfyUI pid {}",
            outcome.duration.as_secs_f64(),
            outcome.pid
        );
        Ok(CommandResult::success())
    }
}
