//! screening-instruments
//!
//! Clinical screening instrument definitions and calculators. Pure functions of
//! the answers, no I/O. Each instrument maps a patient's answers (plus derived
//! age) to a score and a verdict, and never fails on malformed input: missing
//! or unrecognized answers contribute zero points, and SCORE2 answers with an
//! explicit "insufficient data" / "enter cholesterol" verdict instead of a tier.

pub mod config;
pub mod error;
pub mod instruments;
pub mod scoring;

use screening_core::models::answer::AnswerSet;
use screening_core::models::patient::{InstrumentId, ScoreOutcome};

use config::ScoringConfig;
use instruments::{
    audit::Audit, findrisc::Findrisc, gad7::Gad7, nicotine::Nicotine, phq9::Phq9, score2::Score2,
};

/// Derived values some instruments need besides the answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringContext {
    /// `None` or `Some(0)` means unknown.
    pub age: Option<u32>,
}

/// Trait implemented by each screening instrument.
pub trait Instrument: Send + Sync {
    fn id(&self) -> InstrumentId;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// Score one patient's answers.
    fn score(&self, answers: &AnswerSet, ctx: &ScoringContext) -> ScoreOutcome;
}

/// Build the calculator for `id` from the scoring tables.
pub fn build_instrument(id: InstrumentId, config: &ScoringConfig) -> Box<dyn Instrument> {
    match id {
        InstrumentId::Phq9 => Box::new(Phq9::new(config.phq9.clone())),
        InstrumentId::Gad7 => Box::new(Gad7::new(config.gad7.clone())),
        InstrumentId::Audit => Box::new(Audit::new(config.audit.clone())),
        InstrumentId::Nicotine => Box::new(Nicotine::new(config.nicotine.clone())),
        InstrumentId::Findrisc => Box::new(Findrisc::new(
            config.findrisc.clone(),
            config.demographics.clone(),
        )),
        InstrumentId::Score2 => Box::new(Score2::new(
            config.score2.clone(),
            config.demographics.clone(),
        )),
    }
}

/// Return all registered instruments.
pub fn all_instruments(config: &ScoringConfig) -> Vec<Box<dyn Instrument>> {
    InstrumentId::ALL
        .iter()
        .map(|id| build_instrument(*id, config))
        .collect()
}

