//! Bootstrap scenarios through the public API.

use std::fs;
use std::time::Duration;

use comfyup::config::{load_config, validate, LauncherConfig};
use comfyup::runner::Bootstrap;
use comfyup::shell::{CommandResult, MockRunner};
use comfyup::state::{MarkerStore, Step};
use comfyup::ui::{MockUI, Severity};
use comfyup::ComfyupError;
use tempfile::TempDir;

fn ok() -> std::io::Result<CommandResult> {
    Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
}

fn project(yaml: &str) -> (TempDir, LauncherConfig) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("comfyup.yml"), yaml).unwrap();
    let config = load_config(temp.path(), None).unwrap();
    validate(&config).unwrap();
    let config = config.rooted(temp.path());
    (temp, config)
}

fn host(config: &LauncherConfig) -> MockRunner {
    let mut runner = MockRunner::new();
    runner.on("--version", "Python 3.11.4\n");

    let python = comfyup::sys::venv_python(&config.sandbox_path);
    runner.on_with("-m venv", move |_| {
        fs::create_dir_all(python.parent().unwrap())?;
        fs::write(&python, "")?;
        ok()
    });

    let checkout = config.checkout_path.clone();
    runner.on_with("git clone", move |_| {
        fs::create_dir_all(&checkout)?;
        fs::write(checkout.join("requirements.txt"), "torch\n")?;
        ok()
    });

    runner.on(
        "import json, torch",
        r#"{"torch": "2.2.0+cu122", "cuda": "12.2", "available": true, "device": "RTX 3060"}"#,
    );
    runner
}

const QUICK: &str = "wait_for_ready: false\nstartup_grace_seconds: 0\nopen_browser: false\n";

#[test]
fn untested_cuda_build_warns_and_launches() {
    let (_temp, config) = project(QUICK);
    let runner = host(&config);
    let mut ui = MockUI::new();

    Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

    assert!(ui.has_warning("CUDA 12.2 is not a commonly tested build."));
    assert!(ui.has(Severity::Ok, "System compatibility validated."));
    assert_eq!(runner.spawned().len(), 1);
}

#[test]
fn allow_list_from_config_is_honored() {
    let yaml = format!("{}cuda_allow_list: [\"12.2\"]\n", QUICK);
    let (_temp, config) = project(&yaml);
    let runner = host(&config);
    let mut ui = MockUI::new();

    Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

    assert!(ui.has_info("CUDA version is in a supported range."));
    assert_eq!(ui.count(Severity::Warning), 0);
}

#[test]
fn interrupted_clone_is_not_trusted() {
    let (_temp, config) = project(QUICK);
    fs::create_dir_all(&config.checkout_path).unwrap();
    fs::write(config.checkout_path.join("partial"), "").unwrap();
    let mut runner = host(&config);
    runner.fail("rev-parse", 128, "fatal: not a git repository");
    let mut ui = MockUI::new();

    let err = Bootstrap::new(&config, &runner).run(&mut ui).unwrap_err();

    assert!(matches!(err, ComfyupError::IncompleteCheckout { .. }));
    assert!(config.checkout_path.join("partial").exists());
    assert!(runner.spawned().is_empty());

    let markers = MarkerStore::new(&config.state_dir);
    assert!(markers.exists(Step::Sandbox));
    assert!(!markers.exists(Step::Source));
}

#[test]
fn trust_existing_reproduces_skip_on_existence() {
    let yaml = format!("{}idempotency: existence\n", QUICK);
    let (_temp, config) = project(&yaml);
    fs::create_dir_all(&config.sandbox_path).unwrap();
    fs::create_dir_all(&config.checkout_path).unwrap();
    fs::write(config.checkout_path.join("requirements.txt"), "").unwrap();
    let runner = host(&config);
    let mut ui = MockUI::new();

    Bootstrap::new(&config, &runner).run(&mut ui).unwrap();

    assert!(!runner.was_called("-m venv"));
    assert!(!runner.was_called("git clone"));
    assert!(runner.was_called("--upgrade pip"));
    assert!(ui.has_warning("Compatibility could not be determined."));
}

#[test]
fn trust_existing_never_clones_into_an_empty_checkout() {
    let yaml = format!("{}idempotency: existence\n", QUICK);
    let (_temp, config) = project(&yaml);
    fs::create_dir_all(&config.sandbox_path).unwrap();
    fs::create_dir_all(&config.checkout_path).unwrap();
    let runner = host(&config);
    let mut ui = MockUI::new();

    let err = Bootstrap::new(&config, &runner).run(&mut ui).unwrap_err();

    assert!(matches!(err, ComfyupError::ManifestMissing { .. }));
    assert!(!runner.was_called("git clone"));
    assert!(ui.has_info("Skipping clone"));
    assert!(runner.spawned().is_empty());
}
