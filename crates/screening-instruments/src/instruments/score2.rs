use serde::{Deserialize, Serialize};

use screening_core::models::answer::AnswerSet;
use screening_core::models::patient::{InstrumentId, ScoreOutcome, Severity, Verdict};

use crate::config::{Demographics, Sex};
use crate::scoring::{answer_by_fragment, numeric_or_zero};
use crate::{Instrument, ScoringContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score2Rule {
    pub sbp_fragment: String,
    pub cholesterol_fragment: String,
    pub smoking_fragment: String,
    /// Answer meaning "does not smoke". A missing answer counts as this too.
    pub non_smoker_value: String,
    pub labels: Score2Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score2Labels {
    pub insufficient_data: String,
    pub enter_cholesterol: String,
    pub low: String,
    pub moderate: String,
    pub high: String,
}

/// Result of the SCORE2 chart lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score2Tier {
    InsufficientData,
    EnterCholesterol,
    Low,
    Moderate,
    High,
}

/// Inputs read off the clinician form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score2Inputs {
    pub sex: Sex,
    pub smoker: bool,
    /// Systolic blood pressure, mmHg. 0 when missing.
    pub sbp: f64,
    /// Non-HDL cholesterol, mmol/L. 0 when missing.
    pub cholesterol: f64,
}

/// Walk the SCORE2 chart.
///
/// Gates come first: no age means no verdict, no cholesterol means the
/// clinician has to enter it. Then the low-risk cell, then the moderate cells,
/// and everything else is high risk.
pub fn classify(inputs: &Score2Inputs, age: Option<u32>) -> Score2Tier {
    let age = match age {
        Some(age) if age > 0 => age,
        _ => return Score2Tier::InsufficientData,
    };
    if inputs.cholesterol <= 0.0 {
        return Score2Tier::EnterCholesterol;
    }
    if is_low(inputs, age) {
        Score2Tier::Low
    } else if is_moderate(inputs, age) {
        Score2Tier::Moderate
    } else {
        Score2Tier::High
    }
}

fn is_low(inputs: &Score2Inputs, age: u32) -> bool {
    let Score2Inputs {
        sex,
        smoker,
        sbp,
        cholesterol: chol,
    } = *inputs;

    if sex != Sex::Female || smoker {
        return false;
    }
    (age < 45 && sbp < 120.0 && chol <= 5.0) || (49 < age && age < 55 && sbp < 120.0 && chol <= 3.0)
}

fn is_moderate(inputs: &Score2Inputs, age: u32) -> bool {
    let Score2Inputs {
        sex,
        smoker,
        sbp,
        cholesterol: chol,
    } = *inputs;

    if sbp >= 180.0 || chol >= 8.0 {
        return false;
    }

    match (sex, smoker) {
        (Sex::Female, false) => match age {
            0..50 => true,
            50..55 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 6.0)),
            55..60 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 5.0)),
            60..70 => !(sbp >= 140.0 || chol >= 6.0),
            70..90 => !(sbp >= 160.0 || chol >= 7.0),
            _ => false,
        },
        (Sex::Female, true) => match age {
            0..50 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 6.0)),
            50..55 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 5.0)),
            55..70 => !(sbp >= 140.0 || (sbp >= 120.0 && chol >= 5.0)),
            70..90 => !(sbp >= 140.0 || chol >= 6.0),
            _ => false,
        },
        (Sex::Male, false) => match age {
            0..50 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 6.0)),
            50..55 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 5.0)),
            55..70 => !(sbp >= 140.0 || chol >= 6.0),
            70..90 => !(sbp >= 140.0 || chol >= 6.0),
            _ => false,
        },
        (Sex::Male, true) => match age {
            0..50 => !(sbp >= 160.0 || (sbp >= 140.0 && chol >= 5.0)),
            50..55 => !(sbp >= 140.0 || chol >= 6.0),
            55..70 => !(sbp >= 120.0 || chol >= 4.0),
            70..90 => !(sbp >= 120.0 || chol >= 5.0),
            _ => false,
        },
        (Sex::Other, _) => false,
    }
}

/// SCORE2 cardiovascular risk chart. Produces a tier, never a running sum.
pub struct Score2 {
    rule: Score2Rule,
    demographics: Demographics,
}

impl Score2 {
    pub fn new(rule: Score2Rule, demographics: Demographics) -> Self {
        Self { rule, demographics }
    }

    pub fn default_rule() -> Score2Rule {
        Score2Rule {
            sbp_fragment: "[SCORE2] Систолічний артеріальний тиск".to_string(),
            cholesterol_fragment: "[SCORE2] Рівень non-HDL холестерину".to_string(),
            smoking_fragment: "[SCORE2] Куріння тютюнових виробів".to_string(),
            non_smoker_value: "Ні".to_string(),
            labels: Score2Labels {
                insufficient_data: "insufficient data".to_string(),
                enter_cholesterol: "enter cholesterol".to_string(),
                low: "low risk".to_string(),
                moderate: "moderate risk".to_string(),
                high: "high risk".to_string(),
            },
        }
    }

    pub fn inputs(&self, answers: &AnswerSet) -> Score2Inputs {
        let rule = &self.rule;
        let smoker = answer_by_fragment(answers, &rule.smoking_fragment)
            .is_some_and(|a| a.to_string() != rule.non_smoker_value);

        Score2Inputs {
            sex: self.demographics.sex(answers),
            smoker,
            sbp: numeric_or_zero(answer_by_fragment(answers, &rule.sbp_fragment)),
            cholesterol: numeric_or_zero(answer_by_fragment(answers, &rule.cholesterol_fragment)),
        }
    }

    fn verdict(&self, tier: Score2Tier) -> Verdict {
        let labels = &self.rule.labels;
        match tier {
            Score2Tier::InsufficientData => Verdict::new(&labels.insufficient_data, Severity::Unknown),
            Score2Tier::EnterCholesterol => Verdict::new(&labels.enter_cholesterol, Severity::Unknown),
            Score2Tier::Low => Verdict::new(&labels.low, Severity::Low),
            Score2Tier::Moderate => Verdict::new(&labels.moderate, Severity::Moderate),
            Score2Tier::High => Verdict::new(&labels.high, Severity::High),
        }
    }
}

impl Instrument for Score2 {
    fn id(&self) -> InstrumentId {
        InstrumentId::Score2
    }

    fn name(&self) -> &str {
        "SCORE2"
    }

    fn score(&self, answers: &AnswerSet, ctx: &ScoringContext) -> ScoreOutcome {
        let tier = classify(&self.inputs(answers), ctx.age);
        ScoreOutcome {
            score: None,
            verdict: self.verdict(tier),
        }
    }
}
