use screening_core::models::correction::CorrectionField;
use screening_core::models::patient::{InstrumentId, Role};
use screening_reconcile::config::{CURRENT_VERSION, load_config, migrate, parse_config};
use screening_reconcile::error::ConfigError;
use screening_storage::SourceLocation;

const V0: &str = r#"{
    "sources": [
        {
            "id": "doctor_form",
            "name": "Лікар",
            "url": "https://docs.example/doctor?output=csv",
            "tags": ["Findrisc", "SCORE2"],
            "identity_map": {"Name": "ПІБ", "DOB": "Дата народження"}
        },
        {
            "id": "patient_form",
            "name": "Пацієнт",
            "url": "https://docs.example/patient?output=csv",
            "tags": ["PHQ", "GAD", "Паління", "AUDIT"],
            "identity_map": {"Name": "Прізвище", "DOB": "Дата народження"}
        }
    ]
}"#;

#[test]
fn v0_config_is_migrated() {
    let config = parse_config(V0).unwrap();

    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.sources.len(), 2);

    let doctor = &config.sources[0];
    assert_eq!(doctor.role, Role::Doctor);
    assert_eq!(
        doctor.location,
        SourceLocation::Url("https://docs.example/doctor?output=csv".to_string())
    );
    assert_eq!(doctor.instruments(), vec![InstrumentId::Findrisc, InstrumentId::Score2]);

    let patient = &config.sources[1];
    assert_eq!(patient.role, Role::Patient);
    assert_eq!(patient.name_column, "Прізвище");
    assert_eq!(patient.timestamp_column.as_deref(), Some("Позначка часу"));
    assert_eq!(patient.instruments().len(), 4);

    assert_eq!(config.cache_ttl_secs, 60);
    assert!(config.corrections.is_none());
}

#[test]
fn v1_config_with_corrections() {
    let json = r#"{
        "config_version": 1,
        "sources": [
            { "id": "doctor", "role": "doctor", "location": { "path": "/data/doctor.csv" } }
        ],
        "corrections": { "location": { "path": "/data/corrections.csv" } },
        "cache_ttl_secs": 5
    }"#;
    let config = parse_config(json).unwrap();

    assert_eq!(config.sources[0].name_column, "ПІБ");
    assert_eq!(config.cache_ttl_secs, 5);
    let corrections = config.corrections.unwrap();
    assert_eq!(corrections.field, CorrectionField::NonHdlCholesterol);
    assert_eq!(corrections.layout.value_header, "Холестерин");
}

#[test]
fn newer_version_is_rejected() {
    let err = migrate(serde_json::json!({ "config_version": 9 }), 9).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedVersion { found: 9, .. }));
}

#[test]
fn duplicate_source_ids_are_rejected() {
    let json = r#"{
        "config_version": 1,
        "sources": [
            { "id": "a", "role": "doctor", "location": { "url": "https://x.example/a" } },
            { "id": "a", "role": "patient", "location": { "url": "https://x.example/b" } }
        ]
    }"#;
    assert!(matches!(parse_config(json), Err(ConfigError::DuplicateSource(id)) if id == "a"));
}

#[test]
fn invalid_scoring_override_is_rejected() {
    let json = r#"{
        "config_version": 1,
        "scoring": {
            "gad7": {
                "columns": { "tag": "[GAD]" },
                "points": {},
                "scale": [ { "min": 5, "label": "mild", "severity": "low" } ]
            }
        }
    }"#;
    assert!(matches!(parse_config(json), Err(ConfigError::Scoring(_))));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("config.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, V0).unwrap();
    assert_eq!(load_config(&path).unwrap().sources.len(), 2);
}
