#![allow(dead_code)]

use jiff::civil::{Date, date};

use screening_core::models::patient::Role;
use screening_instruments::config::ScoringConfig;
use screening_instruments::{Instrument, all_instruments};
use screening_reconcile::config::SourceConfig;
use screening_storage::{SourceLocation, Table};

pub const DOCTOR_HEADERS: &[&str] = &[
    "Позначка часу",
    "ПІБ",
    "Дата народження",
    "Вкажіть стать",
    "[SCORE2] Систолічний артеріальний тиск",
    "[SCORE2] Рівень non-HDL холестерину",
    "[SCORE2] Куріння тютюнових виробів",
    "Коментар",
];

pub const PATIENT_HEADERS: &[&str] = &[
    "Позначка часу",
    "ПІБ",
    "Дата народження",
    "[PHQ] 1",
    "[PHQ] 2",
    "[PHQ] 3",
    "[PHQ] 4",
    "[PHQ] 5",
    "[PHQ] 6",
    "[PHQ] 7",
    "[PHQ] 8",
    "[PHQ] 9",
    "Коментар",
];

pub const PHQ_TEXT: [&str; 4] = [
    "Не турбували взагалі",
    "Протягом декількох днів",
    "Більше половини цього часу",
    "Майже кожного дня",
];

pub fn today() -> Date {
    date(2026, 10, 18)
}

pub fn instruments() -> Vec<Box<dyn Instrument>> {
    all_instruments(&ScoringConfig::default())
}

fn source(id: &str, role: Role) -> SourceConfig {
    SourceConfig {
        id: id.to_string(),
        role,
        name: id.to_string(),
        location: SourceLocation::Url(format!("https://forms.invalid/{id}.csv")),
        name_column: "ПІБ".to_string(),
        dob_column: "Дата народження".to_string(),
        timestamp_column: Some("Позначка часу".to_string()),
        instruments: Vec::new(),
    }
}

pub fn doctor_source() -> SourceConfig {
    source("doctor_form", Role::Doctor)
}

pub fn patient_source() -> SourceConfig {
    source("patient_form", Role::Patient)
}

/// One doctor-form row: timestamp, name, dob, sex, sbp, cholesterol, smoking, comment.
pub fn doctor_row(
    ts: &str,
    name: &str,
    dob: &str,
    sex: &str,
    sbp: &str,
    chol: &str,
    smoking: &str,
) -> Vec<String> {
    [ts, name, dob, sex, sbp, chol, smoking, ""]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// One patient-form row with PHQ answers given as points.
pub fn patient_row(ts: &str, name: &str, dob: &str, phq: &[usize; 9], comment: &str) -> Vec<String> {
    let mut row = vec![ts.to_string(), name.to_string(), dob.to_string()];
    row.extend(phq.iter().map(|p| PHQ_TEXT[*p].to_string()));
    row.push(comment.to_string());
    row
}

pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    Table {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}
