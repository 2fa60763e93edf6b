use serde::{Deserialize, Serialize};

use screening_core::models::answer::{AnswerSet, find_by_fragment};
use screening_core::models::patient::{InstrumentId, ScoreOutcome, Severity};

use crate::config::Demographics;
use crate::scoring::{NumericBands, PointsTable, VerdictScale, answer_by_fragment, numeric_or_zero};
use crate::{Instrument, ScoringContext};

/// A yes/no style question with its own substitution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalItem {
    pub fragment: String,
    pub points: PointsTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindriscRule {
    pub items: Vec<CategoricalItem>,
    pub age_bands: NumericBands,
    pub bmi_fragment: String,
    pub bmi_bands: NumericBands,
    pub waist_fragment: String,
    pub waist_male: NumericBands,
    pub waist_other: NumericBands,
    pub scale: VerdictScale,
}

/// Points of each FINDRISC component, kept apart for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindriscBreakdown {
    pub items: u32,
    pub age: u32,
    pub bmi: u32,
    pub waist: u32,
}

impl FindriscBreakdown {
    pub fn total(&self) -> u32 {
        self.items + self.age + self.bmi + self.waist
    }
}

/// FINDRISC: Finnish Diabetes Risk Score.
pub struct Findrisc {
    rule: FindriscRule,
    demographics: Demographics,
}

impl Findrisc {
    pub fn new(rule: FindriscRule, demographics: Demographics) -> Self {
        Self { rule, demographics }
    }

    pub fn default_rule() -> FindriscRule {
        let item = |fragment: &str, pairs: &[(&str, u32)]| CategoricalItem {
            fragment: fragment.to_string(),
            points: PointsTable::from_pairs(pairs),
        };

        FindriscRule {
            items: vec![
                item(
                    "[Findrisc] Чи маєте ви щодня принаймні 30 хв фізичної активності",
                    &[("Так", 0), ("Ні", 1)],
                ),
                item(
                    "[Findrisc] Як часто ви їсте овочі, фрукти або ягоди?",
                    &[("Кожного дня", 0), ("Не кожного дня", 1)],
                ),
                item(
                    "[Findrisc] Чи приймали ви коли-небудь регулярно ліки від підвищеного тиску?",
                    &[("Ні", 0), ("Так", 2)],
                ),
                item(
                    "[Findrisc] Чи виявляли у вас коли-небудь підвищений рівень глюкози в крові",
                    &[("Так", 5), ("Ні", 0)],
                ),
                item(
                    "[Findrisc] Чи був у когось із ваших близьких родичів або інших родичів діагностований цукровий діабет",
                    &[
                        ("Так: у батьків, братів, сестер або дітей", 5),
                        (
                            "Так: тільки у дідуся/бабусі, тітки, дядька або двоюрідного брата/сестри",
                            3,
                        ),
                        ("Ні", 0),
                    ],
                ),
            ],
            age_bands: NumericBands::new(&[44.0, 54.0, 64.0], &[0, 2, 3, 4]),
            bmi_fragment: "[Findrisc] ІМТ".to_string(),
            bmi_bands: NumericBands::new(&[24.0, 30.0], &[0, 1, 3]),
            waist_fragment: "[Findrisc] Окружність талії".to_string(),
            waist_male: NumericBands::new(&[94.0, 102.0], &[0, 3, 4]),
            waist_other: NumericBands::new(&[80.0, 88.0], &[0, 3, 4]),
            scale: VerdictScale::from_bands(&[
                (21, "very high risk (1 in 2)", Severity::VeryHigh),
                (15, "high risk (1 in 3)", Severity::High),
                (12, "moderate risk (1 in 6)", Severity::Moderate),
                (7, "slightly elevated risk (1 in 25)", Severity::Low),
                (0, "low risk (1 in 100)", Severity::Minimal),
            ]),
        }
    }

    pub fn breakdown(&self, answers: &AnswerSet, ctx: &ScoringContext) -> FindriscBreakdown {
        let rule = &self.rule;

        let items = rule
            .items
            .iter()
            .filter_map(|item| {
                find_by_fragment(answers, &item.fragment).map(|(_, answer)| item.points.points(answer))
            })
            .sum();

        let age = rule.age_bands.points(f64::from(ctx.age.unwrap_or(0)));
        let bmi = rule
            .bmi_bands
            .points(numeric_or_zero(answer_by_fragment(answers, &rule.bmi_fragment)));

        let waist_cm = numeric_or_zero(answer_by_fragment(answers, &rule.waist_fragment));
        let waist = if self.demographics.is_male(answers) {
            rule.waist_male.points(waist_cm)
        } else {
            rule.waist_other.points(waist_cm)
        };

        FindriscBreakdown {
            items,
            age,
            bmi,
            waist,
        }
    }
}

impl Instrument for Findrisc {
    fn id(&self) -> InstrumentId {
        InstrumentId::Findrisc
    }

    fn name(&self) -> &str {
        "FINDRISC"
    }

    fn score(&self, answers: &AnswerSet, ctx: &ScoringContext) -> ScoreOutcome {
        let score = self.breakdown(answers, ctx).total();
        ScoreOutcome {
            score: Some(score),
            verdict: self.rule.scale.verdict(score),
        }
    }
}
