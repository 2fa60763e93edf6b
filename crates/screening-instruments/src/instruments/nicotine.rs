use serde::{Deserialize, Serialize};

use screening_core::models::answer::AnswerSet;
use screening_core::models::patient::{InstrumentId, ScoreOutcome, Severity};

use crate::scoring::{ColumnRule, NumericBands, PointsTable, VerdictScale};
use crate::{Instrument, ScoringContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicotineRule {
    pub columns: ColumnRule,
    pub points: PointsTable,
    /// Fragment identifying the cigarettes-per-day question among the tagged
    /// columns. That answer is binned instead of looked up.
    pub count_fragment: String,
    pub count_bands: NumericBands,
    pub scale: VerdictScale,
}

/// Fagerström-style nicotine dependence test.
pub struct Nicotine {
    rule: NicotineRule,
}

impl Nicotine {
    pub fn new(rule: NicotineRule) -> Self {
        Self { rule }
    }

    pub fn default_rule() -> NicotineRule {
        NicotineRule {
            columns: ColumnRule::new("[Паління]"),
            points: PointsTable::from_pairs(&[
                ("Через 1 год.", 0),
                ("Від 1/2 до 1 години", 1),
                ("Від 6 до 30 хв.", 2),
                ("5 хв або менше", 3),
                ("Ні", 1),
                ("Так", 2),
                ("Будь-якої іншої", 1),
                ("Першої вранці", 3),
            ]),
            count_fragment: "Скільки сигарет".to_string(),
            count_bands: NumericBands::new(&[10.0, 20.0, 30.0], &[0, 1, 2, 3]),
            scale: VerdictScale::from_bands(&[
                (8, "very high nicotine dependence", Severity::VeryHigh),
                (6, "high nicotine dependence", Severity::High),
                (1, "low nicotine dependence", Severity::Low),
                (0, "no nicotine dependence", Severity::Minimal),
            ]),
        }
    }
}

impl Instrument for Nicotine {
    fn id(&self) -> InstrumentId {
        InstrumentId::Nicotine
    }

    fn name(&self) -> &str {
        "Nicotine dependence"
    }

    fn score(&self, answers: &AnswerSet, _ctx: &ScoringContext) -> ScoreOutcome {
        let rule = &self.rule;
        let score = answers
            .iter()
            .filter(|(label, _)| rule.columns.includes(label))
            .map(|(label, answer)| {
                if label.contains(rule.count_fragment.as_str()) {
                    rule.count_bands.points(answer.to_number().unwrap_or(0.0))
                } else {
                    rule.points.points(answer)
                }
            })
            .sum();

        ScoreOutcome {
            score: Some(score),
            verdict: rule.scale.verdict(score),
        }
    }
}
