use screening_core::models::answer::AnswerSet;
use screening_core::models::patient::{InstrumentId, ScoreOutcome, Severity};

use crate::scoring::{BagRule, ColumnRule, PointsTable, VerdictScale, bag_score};
use crate::{Instrument, ScoringContext};

/// AUDIT: Alcohol Use Disorders Identification Test. Frequency, quantity and
/// consequence items share one points table.
pub struct Audit {
    rule: BagRule,
}

impl Audit {
    pub fn new(rule: BagRule) -> Self {
        Self { rule }
    }

    pub fn default_rule() -> BagRule {
        BagRule {
            columns: ColumnRule::new("[ AUDIT]"),
            points: PointsTable::from_pairs(&[
                // Frequency
                ("Ніколи", 0),
                ("Один раз на місяць або рідше", 1),
                ("2–4 рази на місяць", 2),
                ("2–3 рази на тиждень", 3),
                ("4 рази на тиждень або частіше", 4),
                ("Щомісяця", 2),
                ("Щотижня", 3),
                ("Щодня або майже щодня", 4),
                // Standard drinks per occasion
                ("1–2 СП", 0),
                ("3–4 СП", 1),
                ("5–6 СП", 2),
                ("7–9 СП", 3),
                ("10 СП і більше", 4),
                // Injury / concern items
                ("Ні", 0),
                ("Так, більше ніж 12 місяців тому", 2),
                ("Так, упродовж останніх 12 місяців", 4),
            ]),
            scale: VerdictScale::from_bands(&[
                (20, "possible alcohol dependence", Severity::VeryHigh),
                (8, "high-risk drinking", Severity::High),
                (1, "low-risk drinking", Severity::Low),
                (0, "likely abstinent", Severity::Minimal),
            ]),
        }
    }
}

impl Instrument for Audit {
    fn id(&self) -> InstrumentId {
        InstrumentId::Audit
    }

    fn name(&self) -> &str {
        "AUDIT"
    }

    fn score(&self, answers: &AnswerSet, _ctx: &ScoringContext) -> ScoreOutcome {
        let score = bag_score(answers, &self.rule.columns, &self.rule.points);
        ScoreOutcome {
            score: Some(score),
            verdict: self.rule.scale.verdict(score),
        }
    }
}
