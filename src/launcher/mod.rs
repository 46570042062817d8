//! Application launch.
//!
//! The application runs as a detached child: comfyup never reads its output,
//! never waits for it to exit, and never restarts it. Once startup has been
//! observed the handle is released and the child keeps running on its own.

pub mod browser;
pub mod readiness;

pub use browser::{BrowserOpener, MockBrowser, SystemBrowser};
pub use readiness::{wait_until_ready, Readiness, ReadinessPolicy};

use std::fmt;
use std::thread;
use std::time::Duration;

use crate::config::LauncherConfig;
use crate::error::{ComfyupError, Result};
use crate::provision::{SandboxHandle, SourceCheckout};
use crate::shell::{CommandRunner, ProcessCommand, RunningProcess};
use crate::ui::UserInterface;

/// A started application process.
pub struct LaunchedProcess {
    pub process: Box<dyn RunningProcess>,
    /// Rendered argv, for display.
    pub command_line: String,
    /// `host:port` a local client reaches the application on.
    pub address: String,
}

impl LaunchedProcess {
    pub fn pid(&self) -> u32 {
        self.process.id()
    }
}

impl fmt::Debug for LaunchedProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchedProcess")
            .field("pid", &self.pid())
            .field("command_line", &self.command_line)
            .field("address", &self.address)
            .finish()
    }
}

/// Build the application command line.
pub fn launch_command(
    config: &LauncherConfig,
    sandbox: &SandboxHandle,
    checkout: &SourceCheckout,
) -> ProcessCommand {
    ProcessCommand::new(&sandbox.python)
        .arg(&config.entry_point)
        .args(["--listen", config.bind_host.as_str()])
        .args(["--port", config.bind_port.to_string().as_str()])
        .args(&config.launch_args)
        .current_dir(&checkout.path)
}

/// Start the application without waiting for it.
pub fn launch(
    runner: &dyn CommandRunner,
    config: &LauncherConfig,
    sandbox: &SandboxHandle,
    checkout: &SourceCheckout,
    ui: &mut dyn UserInterface,
) -> Result<LaunchedProcess> {
    ui.info("Starting ComfyUI server...");

    let command = launch_command(config, sandbox, checkout);
    let command_line = command.to_string();
    let process = runner
        .spawn(&command)
        .map_err(|e| ComfyupError::SpawnFailed {
            command: command_line.clone(),
            message: e.to_string(),
        })?;

    tracing::debug!("Started {} (pid {})", command_line, process.id());
    Ok(LaunchedProcess {
        process,
        command_line,
        address: config.client_address(),
    })
}

/// Wait until the application can serve requests.
///
/// With `wait_for_ready` the port is polled; otherwise this sleeps for the
/// startup grace period. On failure the child is left running.
pub fn await_startup(
    launched: &mut LaunchedProcess,
    config: &LauncherConfig,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    ui.info("Waiting for ComfyUI to boot...");

    if !config.wait_for_ready {
        thread::sleep(Duration::from_secs(config.startup_grace_seconds));
        return Ok(());
    }

    let policy = ReadinessPolicy::from_config(config);
    match wait_until_ready(&launched.address, launched.process.as_mut(), &policy) {
        Readiness::Ready { elapsed } => {
            ui.info(&format!(
                "ComfyUI is accepting connections on {} after {:.1}s.",
                launched.address,
                elapsed.as_secs_f64()
            ));
            Ok(())
        }
        Readiness::TimedOut { waited } => Err(ComfyupError::TimedOutWaitingForReadiness {
            address: launched.address.clone(),
            waited_secs: waited.as_secs(),
        }),
        Readiness::Exited { code } => Err(ComfyupError::ExitedBeforeReady {
            address: launched.address.clone(),
            code,
        }),
    }
}

/// Open the client view in the default browser.
///
/// Best effort: a failure is reported as a warning. The browser is never
/// waited on.
pub fn open_client_view(browser: &dyn BrowserOpener, url: &str, ui: &mut dyn UserInterface) {
    ui.info("Opening browser...");

    if let Err(e) = browser.open(url) {
        tracing::warn!("Opening {} failed: {}", url, e);
        ui.warning(&format!("Could not open a browser; visit {} manually.", url));
    }
}
