//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, ConfigOverrides};
use crate::config::{load_config, validate, LauncherConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load, override, validate, and root the configuration.
    ///
    /// Layers apply in order: defaults, `comfyup.yml`, then `COMFYUP_*`
    /// environment variables and flags (clap resolves those two).
    pub fn resolve_config(
        &self,
        explicit: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<LauncherConfig> {
        let mut config = load_config(&self.project_root, explicit)?;
        overrides.apply_to(&mut config);
        validate(&config)?;
        Ok(config.rooted(&self.project_root))
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = || -> Result<LauncherConfig> {
            let config = self.resolve_config(cli.config.as_deref(), &cli.overrides)?;
            tracing::debug!("Resolved configuration: {:?}", config);
            Ok(config)
        };

        match &cli.command {
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            Some(Commands::Check) => super::check::CheckCommand::new(config()?).execute(ui),
            Some(Commands::Status) => super::status::StatusCommand::new(config()?).execute(ui),
            Some(Commands::Run) | None => super::run::RunCommand::new(config()?).execute(ui),
        }
    }
}
