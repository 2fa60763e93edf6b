use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use screening_core::models::correction::CorrectionField;
use screening_core::models::patient::{InstrumentId, Role};
use screening_instruments::config::ScoringConfig;
use screening_storage::SourceLocation;
use screening_storage::corrections::CorrectionLayout;

use crate::columns::CorrectionColumns;
use crate::error::ConfigError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SCREENING_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub corrections: Option<CorrectionConfig>,
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// How long a refreshed dataset is served before the next refresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub role: Role,
    /// Display name.
    #[serde(default)]
    pub name: String,
    pub location: SourceLocation,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_dob_column")]
    pub dob_column: String,
    /// Submission timestamp column used for "latest submission wins".
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: Option<String>,
    /// Instruments scored from this source. Empty means the role's defaults.
    #[serde(default)]
    pub instruments: Vec<InstrumentId>,
}

impl SourceConfig {
    pub fn instruments(&self) -> Vec<InstrumentId> {
        if !self.instruments.is_empty() {
            return self.instruments.clone();
        }
        match self.role {
            Role::Doctor => vec![InstrumentId::Findrisc, InstrumentId::Score2],
            Role::Patient => vec![
                InstrumentId::Phq9,
                InstrumentId::Gad7,
                InstrumentId::Audit,
                InstrumentId::Nicotine,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// A `path` location is read-write; a `url` location is read-only.
    pub location: SourceLocation,
    #[serde(default = "default_correction_field")]
    pub field: CorrectionField,
    #[serde(default)]
    pub columns: CorrectionColumns,
    /// Headers used when writing.
    #[serde(default)]
    pub layout: CorrectionLayout,
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_name_column() -> String {
    "ПІБ".to_string()
}

fn default_dob_column() -> String {
    "Дата народження".to_string()
}

fn default_timestamp_column() -> Option<String> {
    Some("Позначка часу".to_string())
}

fn default_correction_field() -> CorrectionField {
    CorrectionField::NonHdlCholesterol
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::DuplicateSource(source.id.clone()));
            }
        }
        self.scoring.validate()?;
        Ok(())
    }
}

/// `$SCREENING_CONFIG`, else `<config dir>/screening/config.json`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("screening").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<ScreeningConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents)?;
    tracing::info!(
        path = %path.display(),
        sources = config.sources.len(),
        corrections = config.corrections.is_some(),
        "config loaded"
    );
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<ScreeningConfig, ConfigError> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ScreeningConfig = serde_json::from_value(migrated)?;
    config.validate()?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
pub fn migrate(
    mut json: serde_json::Value,
    from_version: u32,
) -> Result<serde_json::Value, ConfigError> {
    if from_version > CURRENT_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 → v1: sources carried `url`, `tags` and `identity_map {Name, DOB}`,
    // with the role implied by the id.
    if from_version < 1 {
        let obj = json.as_object_mut().ok_or(ConfigError::NotAnObject)?;
        if let Some(sources) = obj.get_mut("sources").and_then(|s| s.as_array_mut()) {
            for source in sources.iter_mut().filter_map(|s| s.as_object_mut()) {
                migrate_source_v0(source);
            }
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (identity_map, url)");
    }

    Ok(json)
}

fn migrate_source_v0(source: &mut serde_json::Map<String, serde_json::Value>) {
    use serde_json::{Value, json};

    if let Some(Value::Object(map)) = source.remove("identity_map") {
        if let Some(name) = map.get("Name").cloned() {
            source.entry("name_column").or_insert(name);
        }
        if let Some(dob) = map.get("DOB").cloned() {
            source.entry("dob_column").or_insert(dob);
        }
    }

    if let Some(url) = source.remove("url") {
        source.entry("location").or_insert(json!({ "url": url }));
    }

    source.remove("tags");

    if !source.contains_key("role") {
        let is_doctor = source
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| id.contains("doctor"));
        let role = if is_doctor { "doctor" } else { "patient" };
        source.insert("role".to_string(), Value::String(role.to_string()));
    }
}
