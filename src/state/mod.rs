//! Persisted provisioning state.
//!
//! The only state comfyup keeps between runs is a set of completion markers
//! under `<state_dir>/state/`, one per provisioning step.

pub mod marker;

pub use marker::{file_sha256, MarkerStore, Step, StepMarker};
