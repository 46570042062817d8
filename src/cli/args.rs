//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.
//!
//! Option overrides are global, so `comfyup --port 8190` and
//! `comfyup run --port 8190` mean the same thing. Each one can also be set
//! through a `COMFYUP_*` environment variable.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::{Idempotency, LauncherConfig};

/// comfyup - Install and launch ComfyUI in an isolated environment.
#[derive(Debug, Parser)]
#[command(name = "comfyup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default comfyup.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Only show warnings, errors, and results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision and launch ComfyUI (default if no command specified)
    Run,

    /// Run the system compatibility check against the existing environment
    Check,

    /// Show provisioning status
    Status,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Per-option overrides of `comfyup.yml`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigOverrides {
    /// Git URL of the ComfyUI repository
    #[arg(long, global = true, env = "COMFYUP_REPO", value_name = "URL")]
    pub repo: Option<String>,

    /// Branch or tag to clone
    #[arg(long = "ref", global = true, env = "COMFYUP_REF", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Virtual environment directory
    #[arg(long, global = true, env = "COMFYUP_SANDBOX", value_name = "DIR")]
    pub sandbox: Option<PathBuf>,

    /// ComfyUI checkout directory
    #[arg(long, global = true, env = "COMFYUP_CHECKOUT", value_name = "DIR")]
    pub checkout: Option<PathBuf>,

    /// Host Python interpreter used to create the environment
    #[arg(long, global = true, env = "COMFYUP_PYTHON", value_name = "PATH")]
    pub python: Option<String>,

    /// Address ComfyUI listens on
    #[arg(long, global = true, env = "COMFYUP_HOST")]
    pub host: Option<String>,

    /// Port ComfyUI listens on
    #[arg(long, global = true, env = "COMFYUP_PORT")]
    pub port: Option<u16>,

    /// Seconds to wait after launch when readiness polling is off
    #[arg(long, global = true, env = "COMFYUP_GRACE", value_name = "SECONDS")]
    pub grace: Option<u64>,

    /// Sleep for the grace period instead of polling the port
    #[arg(long, global = true, env = "COMFYUP_NO_WAIT_READY")]
    pub no_wait_ready: bool,

    /// Do not open a browser after launch
    #[arg(long, global = true, env = "COMFYUP_NO_BROWSER")]
    pub no_browser: bool,

    /// Trust existing directories without completion markers
    #[arg(long, global = true, env = "COMFYUP_TRUST_EXISTING")]
    pub trust_existing: bool,
}

impl ConfigOverrides {
    /// Apply every override that was given.
    pub fn apply_to(&self, config: &mut LauncherConfig) {
        if let Some(repo) = &self.repo {
            config.repository_url = repo.clone();
        }
        if let Some(r) = &self.git_ref {
            config.repository_ref = Some(r.clone());
        }
        if let Some(sandbox) = &self.sandbox {
            config.sandbox_path = sandbox.clone();
        }
        if let Some(checkout) = &self.checkout {
            config.checkout_path = checkout.clone();
        }
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        if let Some(host) = &self.host {
            config.bind_host = host.clone();
        }
        if let Some(port) = self.port {
            config.bind_port = port;
        }
        if let Some(grace) = self.grace {
            config.startup_grace_seconds = grace;
        }
        if self.no_wait_ready {
            config.wait_for_ready = false;
        }
        if self.no_browser {
            config.open_browser = false;
        }
        if self.trust_existing {
            config.idempotency = Idempotency::Existence;
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
