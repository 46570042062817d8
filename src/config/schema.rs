//! Configuration schema for comfyup.
//!
//! Every option has a default, so an empty (or absent) `comfyup.yml` yields
//! the stock ComfyUI setup: `comfy_venv/`, `ComfyUI/`, `127.0.0.1:8188`.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};

use crate::compat::CudaVersion;

/// Default upstream repository.
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/comfyanonymous/ComfyUI.git";

/// How provisioning steps decide they are already done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Idempotency {
    /// A completion marker must exist; unmarked directories are adopted or rebuilt.
    #[default]
    Marker,
    /// Any existing directory is trusted as complete.
    Existence,
}

/// Root configuration for a bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Git URL of the application.
    pub repository_url: String,

    /// Branch or tag to clone (default branch when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_ref: Option<String>,

    /// Shallow clone depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_depth: Option<u32>,

    /// Virtual environment directory.
    pub sandbox_path: PathBuf,

    /// Application checkout directory.
    pub checkout_path: PathBuf,

    /// Directory holding completion markers.
    pub state_dir: PathBuf,

    /// Host interpreter used to create the sandbox.
    pub python: String,

    /// Dependency manifest, relative to the checkout.
    pub requirements_file: PathBuf,

    /// Extra arguments for `pip install -r`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pip_args: Vec<String>,

    /// Application entry point, relative to the checkout.
    pub entry_point: String,

    /// Extra arguments passed to the application.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub launch_args: Vec<String>,

    /// Address the application listens on.
    pub bind_host: String,

    /// Port the application listens on.
    pub bind_port: u16,

    /// Fixed wait after spawning when readiness polling is disabled.
    pub startup_grace_seconds: u64,

    /// Poll the bound address instead of sleeping.
    pub wait_for_ready: bool,

    /// Give up polling after this long.
    pub readiness_timeout_seconds: u64,

    /// First poll interval.
    pub initial_interval_ms: u64,

    /// Poll interval cap.
    pub max_interval_ms: u64,

    /// Open the client view in a browser once started.
    pub open_browser: bool,

    /// CUDA builds considered tested.
    pub cuda_allow_list: Vec<CudaVersion>,

    /// Step completion strategy.
    pub idempotency: Idempotency,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            repository_ref: None,
            clone_depth: None,
            sandbox_path: PathBuf::from("comfy_venv"),
            checkout_path: PathBuf::from("ComfyUI"),
            state_dir: PathBuf::from(".comfyup"),
            python: crate::sys::default_python().to_string(),
            requirements_file: PathBuf::from("requirements.txt"),
            pip_args: Vec::new(),
            entry_point: "main.py".to_string(),
            launch_args: Vec::new(),
            bind_host: "127.0.0.1".to_string(),
            bind_port: 8188,
            startup_grace_seconds: 5,
            wait_for_ready: true,
            readiness_timeout_seconds: 120,
            initial_interval_ms: 250,
            max_interval_ms: 2000,
            open_browser: true,
            cuda_allow_list: CudaVersion::default_allow_list(),
            idempotency: Idempotency::default(),
        }
    }
}

impl LauncherConfig {
    /// Host a local client connects to.
    ///
    /// An unspecified bind address (`0.0.0.0`, `::`) is reached through
    /// loopback. IPv6 hosts are bracketed.
    pub fn client_host(&self) -> String {
        match self.bind_host.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) if ip.is_unspecified() => Ipv4Addr::LOCALHOST.to_string(),
            Ok(IpAddr::V6(ip)) if ip.is_unspecified() => format!("[{}]", Ipv6Addr::LOCALHOST),
            Ok(IpAddr::V6(ip)) => format!("[{}]", ip),
            _ => self.bind_host.clone(),
        }
    }

    /// `host:port` polled for readiness.
    pub fn client_address(&self) -> String {
        format!("{}:{}", self.client_host(), self.bind_port)
    }

    /// URL of the client view.
    pub fn client_url(&self) -> String {
        format!("http://{}", self.client_address())
    }

    /// Make relative directories absolute against `root`.
    pub fn rooted(mut self, root: &Path) -> Self {
        for path in [
            &mut self.sandbox_path,
            &mut self.checkout_path,
            &mut self.state_dir,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_setup() {
        let config = LauncherConfig::default();
        assert_eq!(config.repository_url, DEFAULT_REPOSITORY_URL);
        assert_eq!(config.sandbox_path, PathBuf::from("comfy_venv"));
        assert_eq!(config.checkout_path, PathBuf::from("ComfyUI"));
        assert_eq!(config.client_address(), "127.0.0.1:8188");
        assert_eq!(config.client_url(), "http://127.0.0.1:8188");
        assert_eq!(config.startup_grace_seconds, 5);
        assert_eq!(config.idempotency, Idempotency::Marker);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config: LauncherConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_only_given_fields() {
        let yaml = r#"
bind_port: 9000
cuda_allow_list: ["12.6"]
idempotency: existence
"#;
        let config: LauncherConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.cuda_allow_list, vec![CudaVersion::new(12, 6)]);
        assert_eq!(config.idempotency, Idempotency::Existence);
        assert_eq!(config.bind_host, "127.0.0.1");
    }

    #[test]
    fn invalid_allow_list_entry_fails_to_parse() {
        let result: Result<LauncherConfig, _> =
            serde_yaml::from_str("cuda_allow_list: [\"twelve\"]");
        assert!(result.is_err());
    }

    #[test]
    fn wildcard_bind_is_reached_through_loopback() {
        let config = LauncherConfig {
            bind_host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.client_address(), "127.0.0.1:8188");
        assert_eq!(config.client_url(), "http://127.0.0.1:8188");

        let config = LauncherConfig {
            bind_host: "::".to_string(),
            ..Default::default()
        };
        assert_eq!(config.client_url(), "http://[::1]:8188");
    }

    #[test]
    fn named_and_ipv6_hosts_are_kept() {
        let config = LauncherConfig {
            bind_host: "comfy-box.local".to_string(),
            bind_port: 9000,
            ..Default::default()
        };
        assert_eq!(config.client_url(), "http://comfy-box.local:9000");

        let config = LauncherConfig {
            bind_host: "::1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.client_address(), "[::1]:8188");
    }

    #[test]
    fn rooted_joins_relative_paths_only() {
        let config = LauncherConfig {
            checkout_path: PathBuf::from("/opt/ComfyUI"),
            ..Default::default()
        }
        .rooted(Path::new("/work"));

        assert_eq!(config.sandbox_path, PathBuf::from("/work/comfy_venv"));
        assert_eq!(config.checkout_path, PathBuf::from("/opt/ComfyUI"));
        assert_eq!(config.state_dir, PathBuf::from("/work/.comfyup"));
    }

    #[test]
    fn serializes_round_trip_through_yaml() {
        let config = LauncherConfig {
            repository_ref: Some("v0.3.10".to_string()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: LauncherConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
