//! Configuration loading, parsing, and validation for comfyup.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use comfyup::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("comfyup.yml"), "bind_port: 8190").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.client_url(), "http://127.0.0.1:8190");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_config, load_config, load_config_file, parse_config, CONFIG_FILE_NAME,
};
pub use schema::{Idempotency, LauncherConfig, DEFAULT_REPOSITORY_URL};
pub use validator::{validate, validate_config, ValidationError};
