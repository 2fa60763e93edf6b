use std::path::PathBuf;

use thiserror::Error;

use screening_core::error::IdentityError;
use screening_instruments::error::InstrumentError;
use screening_storage::StorageError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory found")]
    NoConfigDir,

    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config_version {found} is newer than this build supports ({supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("config is not a JSON object")]
    NotAnObject,

    #[error("duplicate source id: {0}")]
    DuplicateSource(String),

    #[error("invalid scoring tables: {0}")]
    Scoring(#[from] InstrumentError),
}

/// Why a source contributed nothing to a refresh.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source {source_id}: {error}")]
    Fetch {
        source_id: String,
        #[source]
        error: StorageError,
    },

    #[error("source {source_id}: column '{column}' not found")]
    MissingIdentityColumn { source_id: String, column: String },
}

#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("corrections are not configured")]
    NotConfigured,

    #[error("correction table unavailable: {0}")]
    Store(#[from] StorageError),

    #[error("no {role} column in the correction table")]
    UnresolvedColumn { role: &'static str },

    #[error("invalid patient identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("correction value must be a finite number")]
    InvalidValue,
}
