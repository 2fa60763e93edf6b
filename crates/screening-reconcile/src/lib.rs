//! screening-reconcile
//!
//! The refresh pipeline: load every configured source, merge the per-source
//! fragments into one record per patient, apply late corrections, and cache
//! the result.

pub mod columns;
pub mod config;
pub mod corrections;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod merge;

pub use config::{ScreeningConfig, load_config};
pub use dataset::{Dataset, Pipeline, Snapshot};
