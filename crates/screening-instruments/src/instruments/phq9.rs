use screening_core::models::answer::AnswerSet;
use screening_core::models::patient::{InstrumentId, ScoreOutcome, Severity};

use crate::scoring::{BagRule, ColumnRule, PointsTable, VerdictScale, bag_score};
use crate::{Instrument, ScoringContext};

/// PHQ-9: Patient Health Questionnaire, 9 items rated 0–3. Total 0–27.
pub struct Phq9 {
    rule: BagRule,
}

impl Phq9 {
    pub fn new(rule: BagRule) -> Self {
        Self { rule }
    }

    pub fn default_rule() -> BagRule {
        BagRule {
            columns: ColumnRule::new("[PHQ]"),
            points: PointsTable::from_pairs(&[
                ("Не турбували взагалі", 0),
                ("Протягом декількох днів", 1),
                ("Більше половини цього часу", 2),
                ("Майже кожного дня", 3),
            ]),
            scale: VerdictScale::from_bands(&[
                (20, "severe depression", Severity::VeryHigh),
                (15, "moderately severe depression", Severity::High),
                (10, "moderate depression", Severity::Moderate),
                (5, "mild depression", Severity::Low),
                (0, "no depression", Severity::Minimal),
            ]),
        }
    }
}

impl Instrument for Phq9 {
    fn id(&self) -> InstrumentId {
        InstrumentId::Phq9
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn score(&self, answers: &AnswerSet, _ctx: &ScoringContext) -> ScoreOutcome {
        let score = bag_score(answers, &self.rule.columns, &self.rule.points);
        ScoreOutcome {
            score: Some(score),
            verdict: self.rule.scale.verdict(score),
        }
    }
}
