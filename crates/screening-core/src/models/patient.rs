use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::{Answer, AnswerSet};
use crate::identity::Identity;

/// Which form a source carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    /// Clinician-completed form.
    Doctor,
    /// Patient-completed form.
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Doctor => f.write_str("doctor"),
            Role::Patient => f.write_str("patient"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InstrumentId {
    Phq9,
    Gad7,
    Audit,
    Nicotine,
    Findrisc,
    Score2,
}

impl InstrumentId {
    pub const ALL: [InstrumentId; 6] = [
        InstrumentId::Phq9,
        InstrumentId::Gad7,
        InstrumentId::Audit,
        InstrumentId::Nicotine,
        InstrumentId::Findrisc,
        InstrumentId::Score2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentId::Phq9 => "phq9",
            InstrumentId::Gad7 => "gad7",
            InstrumentId::Audit => "audit",
            InstrumentId::Nicotine => "nicotine",
            InstrumentId::Findrisc => "findrisc",
            InstrumentId::Score2 => "score2",
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered severity scale shared by every instrument. Drives dashboard colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    /// Not enough input to classify.
    Unknown,
    Minimal,
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Verdict {
    pub label: String,
    pub severity: Severity,
}

impl Verdict {
    pub fn new(label: impl Into<String>, severity: Severity) -> Self {
        Self {
            label: label.into(),
            severity,
        }
    }
}

/// Result of one instrument for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreOutcome {
    /// `None` for rule-tree instruments (SCORE2) that produce no running sum.
    pub score: Option<u32>,
    pub verdict: Verdict,
}

/// Completion state derived from the two completion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OverallStatus {
    Complete,
    DoctorOnly,
    AwaitingClinician,
    NoData,
}

impl OverallStatus {
    pub fn from_flags(doctor_done: bool, patient_done: bool) -> Self {
        match (doctor_done, patient_done) {
            (true, true) => OverallStatus::Complete,
            (true, false) => OverallStatus::DoctorOnly,
            (false, true) => OverallStatus::AwaitingClinician,
            (false, false) => OverallStatus::NoData,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::Complete => "complete",
            OverallStatus::DoctorOnly => "doctor only, patient pending",
            OverallStatus::AwaitingClinician => "awaiting clinician review",
            OverallStatus::NoData => "no data",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The reconciled per-patient entity. Rebuilt from source data on every
/// refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientRecord {
    pub identity: Identity,
    /// Calendar age at refresh time. `None` or `Some(0)` both mean "unknown"
    /// to the instruments.
    pub age: Option<u32>,
    pub answers: AnswerSet,
    pub scores: BTreeMap<InstrumentId, ScoreOutcome>,
    pub doctor_done: bool,
    pub patient_done: bool,
    pub status: OverallStatus,
}

impl PatientRecord {
    pub fn full_name(&self) -> &str {
        &self.identity.full_name
    }

    pub fn score(&self, id: InstrumentId) -> Option<&ScoreOutcome> {
        self.scores.get(&id)
    }

    pub fn verdict_label(&self, id: InstrumentId) -> Option<&str> {
        self.scores.get(&id).map(|s| s.verdict.label.as_str())
    }

    pub fn answer(&self, label: &str) -> Option<&Answer> {
        self.answers.get(label)
    }

    /// Re-derive `status` from the completion flags.
    pub fn refresh_status(&mut self) {
        self.status = OverallStatus::from_flags(self.doctor_done, self.patient_done);
    }
}
