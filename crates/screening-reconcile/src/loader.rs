use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use jiff::civil::{Date, DateTime};

use screening_core::identity::{Identity, normalize, parse_timestamp};
use screening_core::models::answer::{Answer, AnswerSet};
use screening_core::models::patient::{OverallStatus, PatientRecord, Role};
use screening_instruments::{Instrument, ScoringContext};
use screening_storage::{Table, TableSource};

use crate::config::SourceConfig;
use crate::error::LoadError;

/// Deduplicated, scored records of one source.
#[derive(Debug, Clone)]
pub struct SourceFragment {
    pub source_id: String,
    pub role: Role,
    pub records: Vec<PatientRecord>,
    /// Rows without a usable identity.
    pub dropped: usize,
}

struct Row {
    identity: Identity,
    submitted: Option<DateTime>,
    answers: AnswerSet,
}

/// Fetch one source and turn it into a fragment.
pub fn load_source(
    config: &SourceConfig,
    source: &dyn TableSource,
    instruments: &[Box<dyn Instrument>],
    today: Date,
) -> Result<SourceFragment, LoadError> {
    let table = source.fetch().map_err(|error| LoadError::Fetch {
        source_id: config.id.clone(),
        error,
    })?;
    build_fragment(config, &table, instruments, today)
}

/// Normalize, deduplicate and score one raw table.
pub fn build_fragment(
    config: &SourceConfig,
    table: &Table,
    instruments: &[Box<dyn Instrument>],
    today: Date,
) -> Result<SourceFragment, LoadError> {
    let missing = |column: &str| LoadError::MissingIdentityColumn {
        source_id: config.id.clone(),
        column: column.to_string(),
    };
    let name_col = table
        .column(&config.name_column)
        .ok_or_else(|| missing(&config.name_column))?;
    let dob_col = table
        .column(&config.dob_column)
        .ok_or_else(|| missing(&config.dob_column))?;
    let ts_col = config
        .timestamp_column
        .as_deref()
        .and_then(|c| table.column(c));

    let mut rows = Vec::with_capacity(table.len());
    let mut dropped = 0;
    for index in 0..table.len() {
        let raw_name = table.cell(index, name_col).unwrap_or("");
        let raw_dob = table.cell(index, dob_col).unwrap_or("");
        let identity = match normalize(raw_name, raw_dob) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::debug!(source = %config.id, row = index, error = %e, "row dropped");
                dropped += 1;
                continue;
            }
        };

        let submitted = ts_col
            .and_then(|c| table.cell(index, c))
            .and_then(parse_timestamp);

        let answers = table
            .headers
            .iter()
            .enumerate()
            .filter(|(col, _)| *col != name_col && *col != dob_col && Some(*col) != ts_col)
            .filter_map(|(col, header)| {
                let answer = Answer::from_cell(table.cell(index, col)?)?;
                Some((header.clone(), answer))
            })
            .collect();

        rows.push(Row {
            identity,
            submitted,
            answers,
        });
    }

    // Form exports append, so later rows are newer: start from reverse file
    // order and let the stable sort keep it among equal or unreadable
    // timestamps. Latest submission first; unreadable timestamps go last.
    rows.reverse();
    if ts_col.is_some() {
        rows.sort_by(|a, b| match (a.submitted, b.submitted) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    let wanted = config.instruments();
    let scorers: Vec<&dyn Instrument> = instruments
        .iter()
        .map(|i| i.as_ref())
        .filter(|i| wanted.contains(&i.id()))
        .collect();

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for row in rows {
        if !seen.insert(row.identity.clone()) {
            continue;
        }
        records.push(score_row(row, config.role, &scorers, today));
    }

    tracing::info!(
        source = %config.id,
        rows = table.len(),
        records = records.len(),
        dropped,
        "source loaded"
    );

    Ok(SourceFragment {
        source_id: config.id.clone(),
        role: config.role,
        records,
        dropped,
    })
}

fn score_row(row: Row, role: Role, scorers: &[&dyn Instrument], today: Date) -> PatientRecord {
    let age = Some(row.identity.age_on(today));
    let ctx = ScoringContext { age };
    let scores: BTreeMap<_, _> = scorers
        .iter()
        .map(|i| (i.id(), i.score(&row.answers, &ctx)))
        .collect();

    let doctor_done = role == Role::Doctor;
    let patient_done = role == Role::Patient;
    PatientRecord {
        identity: row.identity,
        age,
        answers: row.answers,
        scores,
        doctor_done,
        patient_done,
        status: OverallStatus::from_flags(doctor_done, patient_done),
    }
}
