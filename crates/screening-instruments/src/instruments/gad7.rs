use screening_core::models::answer::AnswerSet;
use screening_core::models::patient::{InstrumentId, ScoreOutcome, Severity};

use crate::scoring::{BagRule, ColumnRule, PointsTable, VerdictScale, bag_score};
use crate::{Instrument, ScoringContext};

/// GAD-7: Generalized Anxiety Disorder scale, 7 items rated 0–3. Total 0–21.
pub struct Gad7 {
    rule: BagRule,
}

impl Gad7 {
    pub fn new(rule: BagRule) -> Self {
        Self { rule }
    }

    pub fn default_rule() -> BagRule {
        BagRule {
            columns: ColumnRule::new("[GAD]"),
            points: PointsTable::from_pairs(&[
                ("Ніколи", 0),
                ("Кілька днів", 1),
                ("Понад половину часу", 2),
                ("Майже щодня", 3),
            ]),
            scale: VerdictScale::from_bands(&[
                (15, "clinically significant anxiety", Severity::High),
                (10, "moderate anxiety", Severity::Moderate),
                (5, "mild anxiety", Severity::Low),
                (0, "no anxiety", Severity::Minimal),
            ]),
        }
    }
}

impl Instrument for Gad7 {
    fn id(&self) -> InstrumentId {
        InstrumentId::Gad7
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn score(&self, answers: &AnswerSet, _ctx: &ScoringContext) -> ScoreOutcome {
        let score = bag_score(answers, &self.rule.columns, &self.rule.points);
        ScoreOutcome {
            score: Some(score),
            verdict: self.rule.scale.verdict(score),
        }
    }
}
