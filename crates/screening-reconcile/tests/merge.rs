mod common;

use common::*;
use screening_core::models::answer::Answer;
use screening_core::models::patient::{InstrumentId, OverallStatus};
use screening_reconcile::loader::{SourceFragment, build_fragment};
use screening_reconcile::merge::merge;

fn doctor_fragment(rows: Vec<Vec<String>>) -> SourceFragment {
    build_fragment(&doctor_source(), &table(DOCTOR_HEADERS, rows), &instruments(), today()).unwrap()
}

fn patient_fragment(rows: Vec<Vec<String>>) -> SourceFragment {
    build_fragment(&patient_source(), &table(PATIENT_HEADERS, rows), &instruments(), today()).unwrap()
}

#[test]
fn doctor_only_patient_is_kept_with_patient_fields_absent() {
    let merged = merge(vec![
        doctor_fragment(vec![doctor_row(
            "01.10.2026 10:00:00",
            "Коваль Анна",
            "03.04.1970",
            "жінка",
            "130",
            "5",
            "Ні",
        )]),
        patient_fragment(Vec::new()),
    ]);

    assert_eq!(merged.len(), 1);
    let record = &merged[0];
    assert!(record.doctor_done);
    assert!(!record.patient_done);
    assert_eq!(record.status, OverallStatus::DoctorOnly);
    assert_eq!(record.status.label(), "doctor only, patient pending");
    assert!(record.score(InstrumentId::Phq9).is_none());
    assert!(record.answer("[PHQ] 1").is_none());
}

#[test]
fn matching_identities_merge_into_one_complete_record() {
    let merged = merge(vec![
        doctor_fragment(vec![doctor_row(
            "01.10.2026 10:00:00",
            "Коваль Анна",
            "03.04.1970",
            "жінка",
            "130",
            "5",
            "Ні",
        )]),
        patient_fragment(vec![patient_row(
            "30.09.2026 18:00:00",
            "Коваль Анна",
            "3/4/1970",
            &[1; 9],
            "лише пацієнт",
        )]),
    ]);

    assert_eq!(merged.len(), 1);
    let record = &merged[0];
    assert_eq!(record.status, OverallStatus::Complete);
    assert_eq!(record.score(InstrumentId::Phq9).and_then(|s| s.score), Some(9));
    assert!(record.score(InstrumentId::Score2).is_some());
    assert_eq!(record.age, Some(56));
}

#[test]
fn doctor_answer_wins_on_shared_labels() {
    let merged = merge(vec![
        patient_fragment(vec![patient_row(
            "30.09.2026 18:00:00",
            "Коваль Анна",
            "03.04.1970",
            &[0; 9],
            "від пацієнта",
        )]),
        doctor_fragment(vec![{
            let mut row = doctor_row("01.10.2026", "Коваль Анна", "03.04.1970", "жінка", "130", "5", "Ні");
            row[7] = "від лікаря".to_string();
            row
        }]),
    ]);

    assert_eq!(merged[0].answer("Коментар"), Some(&Answer::Text("від лікаря".to_string())));
}

#[test]
fn patient_only_awaits_clinician_and_order_is_doctor_first() {
    let merged = merge(vec![
        patient_fragment(vec![patient_row(
            "30.09.2026 18:00:00",
            "Шевчук Марія",
            "12.12.1990",
            &[0; 9],
            "",
        )]),
        doctor_fragment(vec![doctor_row(
            "01.10.2026 10:00:00",
            "Коваль Анна",
            "03.04.1970",
            "жінка",
            "130",
            "5",
            "Ні",
        )]),
    ]);

    let names: Vec<&str> = merged.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["Коваль Анна", "Шевчук Марія"]);
    assert_eq!(merged[1].status, OverallStatus::AwaitingClinician);
    assert!(!merged[1].doctor_done);
}

#[test]
fn same_name_different_birth_date_stays_apart() {
    let merged = merge(vec![
        doctor_fragment(vec![doctor_row("01.10.2026", "Коваль Анна", "03.04.1970", "жінка", "130", "5", "Ні")]),
        patient_fragment(vec![patient_row("01.10.2026", "Коваль Анна", "04.03.1970", &[0; 9], "")]),
    ]);
    assert_eq!(merged.len(), 2);
}

#[test]
fn no_fragments_is_an_empty_dataset() {
    assert!(merge(Vec::new()).is_empty());
}
