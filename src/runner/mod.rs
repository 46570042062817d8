//! Bootstrap orchestration.

pub mod bootstrap;

pub use bootstrap::{Bootstrap, BootstrapOutcome, RUN_TITLE};
