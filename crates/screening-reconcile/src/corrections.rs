use indexmap::IndexMap;

use screening_core::identity::{Identity, normalize};
use screening_core::models::answer::{Answer, parse_decimal};
use screening_core::models::correction::{CorrectionEntry, CorrectionField};
use screening_core::models::patient::PatientRecord;
use screening_instruments::config::ScoringConfig;
use screening_instruments::{Instrument, ScoringContext};
use screening_storage::{CorrectionStore, Table};

use crate::columns::CorrectionColumns;
use crate::error::CorrectionError;

/// What the correction step did during one refresh.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CorrectionOutcome {
    NotConfigured,
    Applied {
        /// Distinct identities in the correction table.
        entries: usize,
        /// Entries that matched a reconciled record.
        matched: usize,
    },
    Skipped {
        reason: String,
    },
}

/// Turn the raw correction table into one entry per identity.
///
/// Rows with an unusable identity or value are dropped. When an identity
/// appears more than once the last row wins, since the table is append-only
/// and has no timestamp.
pub fn parse_corrections(
    table: &Table,
    columns: &CorrectionColumns,
    field: CorrectionField,
) -> Result<Vec<CorrectionEntry>, CorrectionError> {
    let resolved = columns.resolve(&table.headers)?;
    tracing::debug!(
        name = resolved.name,
        date_of_birth = resolved.date_of_birth,
        value = resolved.value,
        "correction columns resolved"
    );

    let mut latest: IndexMap<Identity, f64> = IndexMap::new();
    for row in 0..table.len() {
        let identity = match normalize(
            table.cell(row, resolved.name).unwrap_or(""),
            table.cell(row, resolved.date_of_birth).unwrap_or(""),
        ) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::debug!(row, error = %e, "correction row dropped");
                continue;
            }
        };
        let Some(value) = table.cell(row, resolved.value).and_then(parse_decimal) else {
            tracing::debug!(row, "correction row without a numeric value dropped");
            continue;
        };
        // Re-inserting keeps the first position but takes the new value.
        latest.insert(identity, value);
    }

    Ok(latest
        .into_iter()
        .map(|(identity, value)| CorrectionEntry {
            identity,
            field,
            value,
        })
        .collect())
}

/// Override the corrected field on matching records and recompute the
/// instruments that depend on it. Returns how many records were corrected.
///
/// Dependent instruments are recomputed for every record with clinician data,
/// not only the corrected ones. Applying the same entries twice leaves the
/// records as after the first application.
pub fn apply_corrections(
    records: &mut [PatientRecord],
    entries: &[CorrectionEntry],
    scoring: &ScoringConfig,
    instruments: &[Box<dyn Instrument>],
) -> usize {
    let by_identity: IndexMap<&Identity, &CorrectionEntry> =
        entries.iter().map(|e| (&e.identity, e)).collect();

    let mut fields: Vec<CorrectionField> = entries.iter().map(|e| e.field).collect();
    fields.sort_by_key(|f| *f as u8);
    fields.dedup();

    let mut matched = 0;
    for record in records.iter_mut() {
        let corrected = match by_identity.get(&record.identity) {
            Some(entry) => {
                override_answer(record, scoring.correction_fragment(entry.field), entry.value);
                matched += 1;
                true
            }
            None => false,
        };

        if !(corrected || record.doctor_done) {
            continue;
        }
        let ctx = ScoringContext { age: record.age };
        for field in &fields {
            for id in field.dependents() {
                if let Some(instrument) = instruments.iter().find(|i| i.id() == *id) {
                    let outcome = instrument.score(&record.answers, &ctx);
                    record.scores.insert(*id, outcome);
                }
            }
        }
    }
    matched
}

/// Replace the answer whose label contains `fragment`, or add one under the
/// fragment itself when the form never asked.
fn override_answer(record: &mut PatientRecord, fragment: &str, value: f64) {
    let label = record
        .answers
        .keys()
        .find(|label| label.contains(fragment))
        .cloned()
        .unwrap_or_else(|| fragment.to_string());
    record.answers.insert(label, Answer::Number(value));
}

/// Load, parse and apply corrections. Failures never abort the refresh;
/// they come back as [`CorrectionOutcome::Skipped`].
pub fn run_corrections(
    records: &mut [PatientRecord],
    store: &dyn CorrectionStore,
    columns: &CorrectionColumns,
    field: CorrectionField,
    scoring: &ScoringConfig,
    instruments: &[Box<dyn Instrument>],
) -> CorrectionOutcome {
    let entries = match store
        .load()
        .map_err(CorrectionError::from)
        .and_then(|table| parse_corrections(&table, columns, field))
    {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(store = %store.describe(), error = %e, "corrections skipped");
            return CorrectionOutcome::Skipped {
                reason: e.to_string(),
            };
        }
    };

    let matched = apply_corrections(records, &entries, scoring, instruments);
    tracing::info!(entries = entries.len(), matched, "corrections applied");
    CorrectionOutcome::Applied {
        entries: entries.len(),
        matched,
    }
}
