mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use screening_core::models::answer::Answer;
use screening_core::models::correction::CorrectionField;
use screening_core::models::patient::{InstrumentId, OverallStatus};
use screening_instruments::config::ScoringConfig;
use screening_reconcile::columns::CorrectionColumns;
use screening_reconcile::corrections::CorrectionOutcome;
use screening_reconcile::error::CorrectionError;
use screening_reconcile::{Dataset, Pipeline};
use screening_storage::corrections::{CorrectionLayout, FileCorrectionStore, MemoryCorrectionStore};
use screening_storage::source::MemorySource;
use screening_storage::{StorageError, Table, TableSource, UpsertOutcome};

struct Unreachable;

impl TableSource for Unreachable {
    fn describe(&self) -> String {
        "unreachable".to_string()
    }

    fn fetch(&self) -> Result<Table, StorageError> {
        Err(StorageError::Fetch {
            url: "https://forms.invalid/patient.csv".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

fn doctor_table() -> Table {
    table(
        DOCTOR_HEADERS,
        vec![doctor_row(
            "01.10.2026 10:00:00",
            "Ivanenko O.",
            "01.02.1970",
            "чоловік",
            "150",
            "",
            "Так",
        )],
    )
}

#[test]
fn doctor_only_patient_needs_cholesterol() {
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(MemorySource::new("doctor", doctor_table())))
        .with_source(
            patient_source(),
            Box::new(MemorySource::new("patient", table(PATIENT_HEADERS, Vec::new()))),
        );

    let snapshot = pipeline.run(today());
    assert_eq!(snapshot.records.len(), 1);
    assert!(snapshot.skipped.is_empty());
    assert_eq!(snapshot.corrections, CorrectionOutcome::NotConfigured);

    let record = snapshot.patient("Ivanenko O.").unwrap();
    assert!(record.doctor_done);
    assert!(!record.patient_done);
    assert_eq!(record.verdict_label(InstrumentId::Score2), Some("enter cholesterol"));
    assert_eq!(record.status, OverallStatus::DoctorOnly);
}

#[test]
fn failing_source_is_skipped_and_others_still_merge() {
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(MemorySource::new("doctor", doctor_table())))
        .with_source(patient_source(), Box::new(Unreachable));

    let snapshot = pipeline.run(today());
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.skipped.len(), 1);
    assert_eq!(snapshot.skipped[0].source_id, "patient_form");
}

#[test]
fn every_source_failing_is_an_empty_dataset() {
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(Unreachable))
        .with_source(patient_source(), Box::new(Unreachable));

    let snapshot = pipeline.run(today());
    assert!(snapshot.records.is_empty());
    assert_eq!(snapshot.skipped.len(), 2);
}

#[test]
fn corrections_flow_through_the_pipeline() {
    let store = MemoryCorrectionStore::with_table(
        CorrectionLayout::default(),
        Table::with_rows(
            &["ПІБ", "Дата народження", "Холестерин"],
            &[&["Ivanenko O.", "01.02.1970", "5,2"], &["Ivanenko O.", "1.2.1970", "6,1"]],
        ),
    );
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(MemorySource::new("doctor", doctor_table())))
        .with_corrections(Box::new(store), CorrectionColumns::default(), CorrectionField::NonHdlCholesterol);

    let snapshot = pipeline.run(today());
    let record = snapshot.patient("Ivanenko O.").unwrap();
    assert_eq!(
        record.answer("[SCORE2] Рівень non-HDL холестерину"),
        Some(&Answer::Number(6.1))
    );
    assert_eq!(record.verdict_label(InstrumentId::Score2), Some("high risk"));
    assert_eq!(snapshot.corrections, CorrectionOutcome::Applied { entries: 1, matched: 1 });
}

#[test]
fn dataset_serves_cached_snapshot_until_invalidated() {
    let doctor = Arc::new(MemorySource::new("doctor", doctor_table()));
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(Arc::clone(&doctor)));
    let dataset = Dataset::new(pipeline, Duration::from_secs(3600));

    let first = dataset.current();
    doctor.replace(table(DOCTOR_HEADERS, Vec::new()));
    let second = dataset.current();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.records.len(), 1);

    dataset.invalidate();
    assert!(dataset.current().records.is_empty());
}

#[test]
fn expired_snapshot_is_refreshed() {
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(MemorySource::new("doctor", doctor_table())));
    let dataset = Dataset::new(pipeline, Duration::ZERO);

    let first = dataset.current();
    let second = dataset.current();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn recorded_correction_is_visible_on_next_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrections.csv");
    let pipeline = Pipeline::new(ScoringConfig::default())
        .with_source(doctor_source(), Box::new(MemorySource::new("doctor", doctor_table())))
        .with_corrections(
            Box::new(FileCorrectionStore::new(&path, CorrectionLayout::default())),
            CorrectionColumns::default(),
            CorrectionField::NonHdlCholesterol,
        );
    let dataset = Dataset::new(pipeline, Duration::from_secs(3600));

    assert!(dataset.patient("Ivanenko O.").unwrap().answer("[SCORE2] Рівень non-HDL холестерину").is_none());

    let outcome = dataset.record_correction("Ivanenko O.", "1.2.1970", 5.4).unwrap();
    assert_eq!(outcome, UpsertOutcome::Appended);
    assert_eq!(
        dataset.patient("Ivanenko O.").unwrap().answer("[SCORE2] Рівень non-HDL холестерину"),
        Some(&Answer::Number(5.4))
    );

    // Stored in display form, so a second write updates the same row.
    let outcome = dataset.record_correction("ivanenko o.", "01.02.1970", 5.9).unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated { row: 0 });
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "ПІБ,Дата народження,Холестерин\nIvanenko O.,01.02.1970,5.9\n");
}

#[test]
fn correction_writes_are_validated() {
    let unconfigured = Dataset::new(Pipeline::new(ScoringConfig::default()), Duration::from_secs(60));
    assert!(matches!(
        unconfigured.record_correction("Ivanenko O.", "01.02.1970", 5.0),
        Err(CorrectionError::NotConfigured)
    ));

    let pipeline = Pipeline::new(ScoringConfig::default()).with_corrections(
        Box::new(MemoryCorrectionStore::new(CorrectionLayout::default())),
        CorrectionColumns::default(),
        CorrectionField::NonHdlCholesterol,
    );
    let dataset = Dataset::new(pipeline, Duration::from_secs(60));
    assert!(matches!(
        dataset.record_correction("Ivanenko O.", "31.02.1970", 5.0),
        Err(CorrectionError::Identity(_))
    ));
    assert!(matches!(
        dataset.record_correction("Ivanenko O.", "01.02.1970", f64::NAN),
        Err(CorrectionError::InvalidValue)
    ));
}
