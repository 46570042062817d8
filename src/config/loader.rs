//! Configuration file discovery and loading.
//!
//! Layers, lowest priority first:
//! 1. Built-in defaults
//! 2. `comfyup.yml` in the project root (or the file given with `--config`)
//! 3. `COMFYUP_*` environment variables and command-line flags (see
//!    [`crate::cli::ConfigOverrides`])

use crate::config::schema::LauncherConfig;
use crate::error::{ComfyupError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project config file.
pub const CONFIG_FILE_NAME: &str = "comfyup.yml";

/// Find the project config at `<root>/comfyup.yml`.
pub fn find_project_config(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Parse YAML content into a LauncherConfig.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<LauncherConfig> {
    if content.trim().is_empty() {
        return Ok(LauncherConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ComfyupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<LauncherConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ComfyupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ComfyupError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Load the configuration for a project.
///
/// An explicit path must exist. Without one, `comfyup.yml` is optional and
/// the defaults are used when it is absent.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<LauncherConfig> {
    let path = match explicit {
        Some(p) if p.is_relative() => Some(project_root.join(p)),
        Some(p) => Some(p.to_path_buf()),
        None => find_project_config(project_root),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)
        }
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(LauncherConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn loads_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "bind_port: 8190\n").unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.bind_port, 8190);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "\n").unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path(), Some(Path::new("other.yml"))).unwrap_err();
        assert!(matches!(err, ComfyupError::ConfigNotFound { .. }));
    }

    #[test]
    fn explicit_relative_path_is_resolved_against_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("other.yml"), "bind_host: 0.0.0.0\n").unwrap();

        let config = load_config(temp.path(), Some(Path::new("other.yml"))).unwrap();
        assert_eq!(config.bind_host, "0.0.0.0");
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "bind_port: [not a port\n").unwrap();

        let err = load_config(temp.path(), None).unwrap_err();
        match err {
            ComfyupError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected ConfigParseError, got {other:?}"),
        }
    }
}
