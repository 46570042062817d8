//! Host interpreter version probe.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ComfyupError, Result};
use crate::shell::{CommandRunner, ProcessCommand};

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python\s+(\d+)\.(\d+)").expect("valid regex"));

/// Minimum supported minor version of Python 3.
pub const MIN_PYTHON_MINOR: u32 = 10;

/// Version of the host Python interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl RuntimeVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether this version can run ComfyUI (3.10 or newer, within Python 3).
    pub fn is_supported(&self) -> bool {
        self.major == 3 && self.minor >= MIN_PYTHON_MINOR
    }

    /// Fail with [`ComfyupError::UnsupportedRuntime`] unless supported.
    pub fn check(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(ComfyupError::UnsupportedRuntime {
                major: self.major,
                minor: self.minor,
            })
        }
    }

    /// Extract the version from `python --version` output.
    pub fn parse(output: &str) -> Option<Self> {
        let caps = PYTHON_VERSION.captures(output)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        Some(Self { major, minor })
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Run `<interpreter> --version` and parse the result.
///
/// Python 2 prints its version to stderr, so both streams are searched.
pub fn probe_runtime_version(
    runner: &dyn CommandRunner,
    interpreter: &str,
) -> Result<RuntimeVersion> {
    let command = ProcessCommand::new(interpreter).arg("--version").captured();
    let result = runner
        .run(&command)
        .map_err(|e| ComfyupError::RuntimeNotFound {
            interpreter: interpreter.to_string(),
            message: e.to_string(),
        })?;

    let combined = format!("{}\n{}", result.stdout, result.stderr);
    match RuntimeVersion::parse(&combined) {
        Some(version) => {
            tracing::debug!("{} reports Python {}", interpreter, version);
            Ok(version)
        }
        None if !result.success => Err(ComfyupError::RuntimeNotFound {
            interpreter: interpreter.to_string(),
            message: result.diagnostic(),
        }),
        None => Err(ComfyupError::RuntimeVersionUnparsed {
            output: combined.trim().to_string(),
        }),
    }
}
