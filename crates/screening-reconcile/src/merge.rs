use indexmap::IndexMap;

use screening_core::identity::Identity;
use screening_core::models::patient::{OverallStatus, PatientRecord, Role};

use crate::loader::SourceFragment;

/// Outer-join source fragments on identity.
///
/// Doctor fragments are folded in first, so on any collision (age, an answer
/// label present in both forms, an instrument scored by both) the clinician's
/// value wins and the patient's only fills gaps. Output order is first-seen
/// order. Completion flags are OR-ed; a role with no row stays `false`.
pub fn merge(mut fragments: Vec<SourceFragment>) -> Vec<PatientRecord> {
    fragments.sort_by_key(|f| role_priority(f.role));

    let mut merged: IndexMap<Identity, PatientRecord> = IndexMap::new();
    for fragment in fragments {
        for record in fragment.records {
            match merged.get_mut(&record.identity) {
                Some(existing) => absorb(existing, record),
                None => {
                    merged.insert(record.identity.clone(), record);
                }
            }
        }
    }

    merged
        .into_values()
        .map(|mut record| {
            record.refresh_status();
            record
        })
        .collect()
}

fn role_priority(role: Role) -> u8 {
    match role {
        Role::Doctor => 0,
        Role::Patient => 1,
    }
}

fn absorb(into: &mut PatientRecord, from: PatientRecord) {
    if into.age.is_none_or(|age| age == 0) && from.age.is_some() {
        into.age = from.age;
    }
    for (label, answer) in from.answers {
        into.answers.entry(label).or_insert(answer);
    }
    for (id, outcome) in from.scores {
        into.scores.entry(id).or_insert(outcome);
    }
    into.doctor_done |= from.doctor_done;
    into.patient_done |= from.patient_done;
    into.status = OverallStatus::from_flags(into.doctor_done, into.patient_done);
}
