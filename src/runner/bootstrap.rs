//! The bootstrap sequence.
//!
//! Steps run strictly in order and the first fatal error stops the run:
//!
//! 1. runtime gate (nothing is written before it passes)
//! 2. sandbox
//! 3. source checkout
//! 4. dependency install
//! 5. compatibility check (informational only)
//! 6. launch, readiness, client view
//!
//! There are no retries. Re-running is always safe; completed steps are
//! skipped through their markers.

use std::time::{Duration, Instant};

use crate::compat::{render_check, CompatibilityReport, CompatibilityVerdict};
use crate::config::LauncherConfig;
use crate::error::Result;
use crate::launcher::{self, BrowserOpener, SystemBrowser};
use crate::probe::{probe_acceleration, probe_runtime_version, ProbeOutcome, RuntimeVersion};
use crate::provision::{
    ensure_sandbox, ensure_source, install_dependencies, ProvisionContext, SandboxHandle,
};
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Title of the overall run banner.
pub const RUN_TITLE: &str = "COMFYUI ONE-CLICK INSTALL & LAUNCHER";

/// Runs the bootstrap against one configuration.
pub struct Bootstrap<'a> {
    config: &'a LauncherConfig,
    runner: &'a dyn CommandRunner,
    browser: &'a dyn BrowserOpener,
}

/// Result of a successful bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapOutcome {
    /// Pid of the detached application.
    pub pid: u32,
    pub command_line: String,
    pub url: String,
    /// `None` when the compatibility check could not reach a verdict.
    pub compatibility: Option<CompatibilityVerdict>,
    pub duration: Duration,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a LauncherConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            browser: &SystemBrowser,
        }
    }

    /// Use `browser` to open the client view.
    pub fn with_browser(mut self, browser: &'a dyn BrowserOpener) -> Self {
        self.browser = browser;
        self
    }

    /// Provision everything and launch the application.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<BootstrapOutcome> {
        let start = Instant::now();
        let config = self.config;

        ui.banner(RUN_TITLE);
        let version = self.check_runtime(ui)?;

        let ctx = ProvisionContext::new(self.runner, config);
        let sandbox = ensure_sandbox(&ctx, ui)?;
        let checkout = ensure_source(&ctx, ui)?;
        install_dependencies(&ctx, ui, &sandbox, &checkout)?;

        let compatibility = match self.compatibility(ui, version, &sandbox) {
            Ok(report) => report.map(|r| r.verdict),
            Err(e) => {
                tracing::warn!("Compatibility check failed: {}", e);
                None
            }
        };

        let mut launched = launcher::launch(self.runner, config, &sandbox, &checkout, ui)?;
        if let Err(e) = launcher::await_startup(&mut launched, config, ui) {
            ui.warning(&format!(
                "ComfyUI (pid {}) was left running; check its output above.",
                launched.pid()
            ));
            return Err(e);
        }

        let url = config.client_url();
        if config.open_browser {
            launcher::open_client_view(self.browser, &url, ui);
        }

        ui.banner(&format!("ComfyUI is now running at: {}", url));

        Ok(BootstrapOutcome {
            pid: launched.pid(),
            command_line: launched.command_line,
            url,
            compatibility,
            duration: start.elapsed(),
        })
    }

    /// Run only the compatibility check against the existing sandbox.
    pub fn check(&self, ui: &mut dyn UserInterface) -> Result<Option<CompatibilityReport>> {
        let version = self.check_runtime(ui)?;
        let sandbox = SandboxHandle::at(&self.config.sandbox_path);
        self.compatibility(ui, version, &sandbox)
    }

    fn check_runtime(&self, ui: &mut dyn UserInterface) -> Result<RuntimeVersion> {
        let version = probe_runtime_version(self.runner, &self.config.python)?;
        ui.info(&format!("Python version: {}", version));
        version.check()?;
        Ok(version)
    }

    fn compatibility(
        &self,
        ui: &mut dyn UserInterface,
        version: RuntimeVersion,
        sandbox: &SandboxHandle,
    ) -> Result<Option<CompatibilityReport>> {
        let outcome = if sandbox.python.exists() {
            probe_acceleration(self.runner, &sandbox.python)
        } else {
            ProbeOutcome::Unavailable {
                reason: format!("no interpreter at {}", sandbox.python.display()),
            }
        };
        render_check(ui, Some(version), &outcome, &self.config.cuda_allow_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Idempotency;
    use crate::error::ComfyupError;
    use crate::launcher::MockBrowser;
    use crate::shell::{CommandResult, MockRunner};
    use crate::state::{MarkerStore, Step};
    use crate::ui::{MockUI, Severity};
    use std::fs;
    use std::net::TcpListener;
    use std::path::Path;
    use tempfile::TempDir;

    const CUDA_121: &str =
        r#"{"torch": "2.3.0+cu121", "cuda": "12.1", "available": true, "device": "RTX 4090"}"#;

    fn config(root: &Path) -> LauncherConfig {
        LauncherConfig {
            wait_for_ready: false,
            startup_grace_seconds: 0,
            open_browser: false,
            ..LauncherConfig::default().rooted(root)
        }
    }

    /// A runner whose venv and clone commands create what the real tools would.
    fn host(config: &LauncherConfig, python_version: &str) -> MockRunner {
        let mut runner = MockRunner::new();
        runner.on("--version", &format!("Python {}\n", python_version));

        let python = crate::sys::venv_python(&config.sandbox_path);
        runner.on_with("-m venv", move |_| {
            fs::create_dir_all(python.parent().unwrap())?;
            fs::write(&python, "")?;
            Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
        });

        let checkout = config.checkout_path.clone();
        runner.on_with("git clone", move |_| {
            fs::create_dir_all(&checkout)?;
            fs::write(checkout.join("main.py"), "")?;
            fs::write(checkout.join("requirements.txt"), "torch\n")?;
            Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
        });

        runner.on("import json, torch", CUDA_121);
        runner
    }

    fn position(lines: &[String], needle: &str) -> usize {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("{needle} not called in {lines:?}"))
    }

    #[test]
    fn fresh_run_provisions_and_launches() {
        let temp = TempDir::new().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = LauncherConfig {
            wait_for_ready: true,
            bind_port: listener.local_addr().unwrap().port(),
            readiness_timeout_seconds: 5,
            initial_interval_ms: 10,
            ..config(temp.path())
        };
        let runner = host(&config, "3.11.4");
        let mut ui = MockUI::new();

        let outcome = Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

        let calls = runner.call_lines();
        let order = [
            position(&calls, "--version"),
            position(&calls, "-m venv"),
            position(&calls, "git clone"),
            position(&calls, "--upgrade pip"),
            position(&calls, "install -r"),
            position(&calls, "import json, torch"),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{calls:?}");
        assert_eq!(runner.spawned().len(), 1);

        assert_eq!(outcome.compatibility, Some(CompatibilityVerdict::Supported));
        assert_eq!(outcome.url, config.client_url());
        assert_eq!(outcome.pid, 4242);

        let banners = ui.banners();
        assert_eq!(banners.first().map(String::as_str), Some(RUN_TITLE));
        assert_eq!(
            banners.last().unwrap(),
            &format!("ComfyUI is now running at: {}", config.client_url())
        );

        let markers = MarkerStore::new(&config.state_dir);
        for step in Step::ALL {
            assert!(markers.exists(step), "{step:?} marker missing");
        }
    }

    #[test]
    fn unsupported_runtime_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        let runner = host(&config, "3.9.18");
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &runner).run(&mut ui).unwrap_err();

        assert!(matches!(
            err,
            ComfyupError::UnsupportedRuntime { major: 3, minor: 9 }
        ));
        assert_eq!(runner.calls().len(), 1);
        assert!(runner.spawned().is_empty());
        assert!(!config.sandbox_path.exists());
        assert!(!config.checkout_path.exists());
        assert!(!config.state_dir.exists());
        assert!(ui.has_info("Python version: 3.9"));
    }

    #[test]
    fn second_run_reuses_but_reinstalls() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());

        let first = host(&config, "3.12.0");
        Bootstrap::new(&config, &first)
            .run(&mut MockUI::new())
            .unwrap();

        let second = host(&config, "3.12.0");
        let mut ui = MockUI::new();
        Bootstrap::new(&config, &second).run(&mut ui).unwrap();

        assert!(!second.was_called("-m venv"));
        assert!(!second.was_called("git clone"));
        assert!(second.was_called("--upgrade pip"));
        assert!(second.was_called("install -r"));
        assert_eq!(second.spawned().len(), 1);
        assert!(ui.has_info("Virtual environment already exists."));
        assert!(ui.has_info("Skipping clone"));
    }

    #[test]
    fn existence_mode_trusts_unvalidated_directories() {
        let temp = TempDir::new().unwrap();
        let config = LauncherConfig {
            idempotency: Idempotency::Existence,
            ..config(temp.path())
        };
        fs::create_dir_all(&config.sandbox_path).unwrap();
        fs::create_dir_all(&config.checkout_path).unwrap();
        fs::write(config.checkout_path.join("requirements.txt"), "").unwrap();
        let runner = host(&config, "3.10.12");
        let mut ui = MockUI::new();

        let outcome = Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

        assert!(!runner.was_called("-m venv"));
        assert!(!runner.was_called("git clone"));
        assert!(runner.was_called("install -r"));
        assert_eq!(outcome.compatibility, None);
        assert!(ui.has_warning("Compatibility could not be determined."));
    }

    #[test]
    fn cpu_only_build_still_launches() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        let mut runner = host(&config, "3.11.0");
        runner.on(
            "import json, torch",
            r#"{"torch": "2.3.0+cpu", "cuda": null, "available": false, "device": null}"#,
        );
        let mut ui = MockUI::new();

        let outcome = Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

        assert_eq!(outcome.compatibility, Some(CompatibilityVerdict::CpuOnly));
        assert!(ui.has_warning("CPU-only"));
        assert_eq!(runner.spawned().len(), 1);
    }

    #[test]
    fn malformed_cuda_version_is_reported_but_not_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        let mut runner = host(&config, "3.11.0");
        runner.on(
            "import json, torch",
            r#"{"torch": "2.3.0", "cuda": "12", "available": true, "device": "T4"}"#,
        );
        let mut ui = MockUI::new();

        let outcome = Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

        assert_eq!(outcome.compatibility, None);
        assert!(ui.has(Severity::Failed, "Compatibility check failed."));
        assert_eq!(runner.spawned().len(), 1);
    }

    #[test]
    fn install_failure_stops_before_launch() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        let mut runner = host(&config, "3.11.0");
        runner.fail("install -r", 1, "");
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &runner).run(&mut ui).unwrap_err();

        assert!(matches!(err, ComfyupError::InstallFailed { .. }));
        assert!(!runner.was_called("import json, torch"));
        assert!(runner.spawned().is_empty());
    }

    #[test]
    fn spawn_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = LauncherConfig {
            open_browser: true,
            ..config(temp.path())
        };
        let mut runner = host(&config, "3.11.0");
        runner.fail_spawn();
        let browser = MockBrowser::new();
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &runner)
            .with_browser(&browser)
            .run(&mut ui)
            .unwrap_err();

        assert!(matches!(err, ComfyupError::SpawnFailed { .. }));
        assert!(browser.opened().is_empty());
    }

    #[test]
    fn early_exit_skips_browser() {
        let temp = TempDir::new().unwrap();
        let config = LauncherConfig {
            wait_for_ready: true,
            open_browser: true,
            readiness_timeout_seconds: 5,
            initial_interval_ms: 10,
            ..config(temp.path())
        };
        let mut runner = host(&config, "3.11.0");
        runner.spawn_exits_with(Some(1));
        let browser = MockBrowser::new();
        let mut ui = MockUI::new();

        let err = Bootstrap::new(&config, &runner)
            .with_browser(&browser)
            .run(&mut ui)
            .unwrap_err();

        assert!(matches!(err, ComfyupError::ExitedBeforeReady { code: Some(1), .. }));
        assert_eq!(err.exit_code(), 3);
        assert!(browser.opened().is_empty());
        assert!(ui.has_warning("left running"));
    }

    #[test]
    fn opens_browser_after_startup() {
        let temp = TempDir::new().unwrap();
        let config = LauncherConfig {
            open_browser: true,
            ..config(temp.path())
        };
        let runner = host(&config, "3.11.0");
        let browser = MockBrowser::new();

        Bootstrap::new(&config, &runner)
            .with_browser(&browser)
            .run(&mut MockUI::new())
            .unwrap();

        assert_eq!(browser.opened(), vec![config.client_url()]);
    }

    #[test]
    fn check_without_sandbox_is_undetermined() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        let runner = host(&config, "3.11.0");
        let mut ui = MockUI::new();

        let report = Bootstrap::new(&config, &runner).check(&mut ui).unwrap();

        assert!(report.is_none());
        assert!(!runner.was_called("import json, torch"));
        assert!(ui.has_warning("Compatibility could not be determined."));
    }
}
