//! Status command implementation.
//!
//! The `comfyup status` command shows which provisioning steps have
//! completed, without running anything.

use std::path::Path;

use crate::config::{Idempotency, LauncherConfig};
use crate::error::Result;
use crate::state::{file_sha256, MarkerStore, Step};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    config: LauncherConfig,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    fn step_dir(&self, step: Step) -> Option<&Path> {
        match step {
            Step::Sandbox => Some(self.config.sandbox_path.as_path()),
            Step::Source => Some(self.config.checkout_path.as_path()),
            Step::Dependencies => None,
        }
    }

    fn show_step(&self, markers: &MarkerStore, step: Step, ui: &mut dyn UserInterface) {
        let dir = self.step_dir(step);
        match markers.load(step) {
            Some(marker) => {
                let mut line = format!(
                    "{}: completed {}",
                    step.name(),
                    marker.completed_at.format("%Y-%m-%d %H:%M UTC")
                );
                if let Some(detail) = &marker.detail {
                    line.push_str(&format!(" ({})", detail));
                }
                ui.ok(&line);
                if dir.is_some_and(|d| !d.exists()) {
                    ui.warning(&format!(
                        "{}: marker present but {} is missing",
                        step.name(),
                        dir.map(|d| d.display().to_string()).unwrap_or_default()
                    ));
                }
            }
            None => match dir {
                Some(d) if d.exists() => ui.warning(&format!(
                    "{}: {} exists without a completion marker",
                    step.name(),
                    d.display()
                )),
                _ => ui.info(&format!("{}: not completed", step.name())),
            },
        }
    }

    fn show_manifest_drift(&self, markers: &MarkerStore, ui: &mut dyn UserInterface) {
        let manifest = self.config.checkout_path.join(&self.config.requirements_file);
        let recorded = markers
            .load(Step::Dependencies)
            .and_then(|m| m.manifest_sha256);
        let (Some(recorded), Ok(current)) = (recorded, file_sha256(&manifest)) else {
            return;
        };
        if recorded != current {
            ui.warning(&format!(
                "{} changed since the last install; run comfyup to reinstall.",
                manifest.display()
            ));
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = &self.config;
        ui.banner("COMFYUI STATUS");

        match crate::sys::find_on_path(&config.python, &crate::sys::parse_system_path()) {
            Some(path) => ui.info(&format!("Host interpreter: {}", path.display())),
            None => ui.warning(&format!("Host interpreter '{}' not found on PATH", config.python)),
        }
        ui.info(&format!("Virtual environment: {}", config.sandbox_path.display()));
        ui.info(&format!("Checkout: {}", config.checkout_path.display()));
        ui.info(&format!("Client URL: {}", config.client_url()));
        if config.idempotency == Idempotency::Existence {
            ui.info("Existing directories are trusted without markers.");
        }

        let markers = MarkerStore::new(&config.state_dir);
        for step in Step::ALL {
            self.show_step(&markers, step, ui);
        }
        self.show_manifest_drift(&markers, ui);

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StepMarker;
    use crate::ui::{MockUI, Severity};
    use std::fs;
    use tempfile::TempDir;

    fn config(root: &Path) -> LauncherConfig {
        LauncherConfig::default().rooted(root)
    }

    #[test]
    fn fresh_project_reports_nothing_completed() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = StatusCommand::new(config(temp.path()))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_info("sandbox: not completed"));
        assert!(ui.has_info("source: not completed"));
        assert!(ui.has_info("dependencies: not completed"));
        assert_eq!(ui.count(Severity::Ok), 0);
    }

    #[test]
    fn completed_steps_are_ok() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        fs::create_dir_all(&config.sandbox_path).unwrap();
        let markers = MarkerStore::new(&config.state_dir);
        markers
            .write(&StepMarker::now(Step::Sandbox).with_detail("bin/python"))
            .unwrap();
        let mut ui = MockUI::new();

        StatusCommand::new(config).execute(&mut ui).unwrap();

        assert!(ui.has(Severity::Ok, "sandbox: completed"));
        assert!(ui.has(Severity::Ok, "(bin/python)"));
    }

    #[test]
    fn unmarked_directory_is_flagged() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        fs::create_dir_all(&config.checkout_path).unwrap();
        let mut ui = MockUI::new();

        StatusCommand::new(config).execute(&mut ui).unwrap();

        assert!(ui.has_warning("source:"));
        assert!(ui.has_warning("without a completion marker"));
    }

    #[test]
    fn missing_directory_with_marker_is_flagged() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        MarkerStore::new(&config.state_dir)
            .write(&StepMarker::now(Step::Source))
            .unwrap();
        let mut ui = MockUI::new();

        StatusCommand::new(config).execute(&mut ui).unwrap();

        assert!(ui.has_warning("marker present"));
    }

    #[test]
    fn manifest_drift_is_reported() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path());
        fs::create_dir_all(&config.checkout_path).unwrap();
        fs::write(config.checkout_path.join("requirements.txt"), "torch\n").unwrap();
        MarkerStore::new(&config.state_dir)
            .write(&StepMarker::now(Step::Dependencies).with_manifest_hash("stale"))
            .unwrap();
        let mut ui = MockUI::new();

        StatusCommand::new(config).execute(&mut ui).unwrap();

        assert!(ui.has_warning("changed since the last install"));
    }
}
