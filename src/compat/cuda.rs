//! CUDA runtime version parsing.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ComfyupError;

static CUDA_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)$").expect("valid regex"));

/// A CUDA runtime version as reported by `torch.version.cuda`.
///
/// Only the `<major>.<minor>` numeric form is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "VersionRepr", into = "String")]
pub struct CudaVersion {
    pub major: u32,
    pub minor: u32,
}

impl CudaVersion {
    /// Create a version from its parts.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Builds commonly tested against ComfyUI.
    pub fn default_allow_list() -> Vec<CudaVersion> {
        vec![Self::new(11, 8), Self::new(12, 1), Self::new(12, 4)]
    }
}

impl FromStr for CudaVersion {
    type Err = ComfyupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ComfyupError::InvalidAcceleratorVersion {
            value: s.to_string(),
        };
        let caps = CUDA_VERSION.captures(s).ok_or_else(invalid)?;
        let major = caps[1].parse().map_err(|_| invalid())?;
        let minor = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for CudaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<CudaVersion> for String {
    fn from(v: CudaVersion) -> Self {
        v.to_string()
    }
}

/// YAML writes `12.1` as a float; accept both forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Text(String),
    Number(f64),
}

impl TryFrom<VersionRepr> for CudaVersion {
    type Error = ComfyupError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionRepr::Text(s) => s.trim().parse(),
            VersionRepr::Number(n) => n.to_string().parse(),
        }
    }
}
