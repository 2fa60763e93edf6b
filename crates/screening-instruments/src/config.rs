use serde::{Deserialize, Serialize};

use screening_core::models::answer::AnswerSet;
use screening_core::models::correction::CorrectionField;
use screening_core::models::patient::InstrumentId;

use crate::error::InstrumentError;
use crate::instruments::findrisc::{Findrisc, FindriscRule};
use crate::instruments::nicotine::{Nicotine, NicotineRule};
use crate::instruments::score2::{Score2, Score2Rule};
use crate::instruments::{audit::Audit, gad7::Gad7, phq9::Phq9};
use crate::scoring::{BagRule, NumericBands, VerdictScale, answer_by_fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
    Other,
}

/// How the forms record sex. Matching is on the literal answer, never inferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub sex_fragment: String,
    pub female_value: String,
    pub male_value: String,
}

impl Default for Demographics {
    fn default() -> Self {
        Self {
            sex_fragment: "Вкажіть стать".to_string(),
            female_value: "жінка".to_string(),
            male_value: "чоловік".to_string(),
        }
    }
}

impl Demographics {
    pub fn sex(&self, answers: &AnswerSet) -> Sex {
        match answer_by_fragment(answers, &self.sex_fragment).map(|a| a.to_string()) {
            Some(v) if v == self.female_value => Sex::Female,
            Some(v) if v == self.male_value => Sex::Male,
            _ => Sex::Other,
        }
    }

    pub fn is_male(&self, answers: &AnswerSet) -> bool {
        self.sex(answers) == Sex::Male
    }
}

/// Every scoring table, built once at startup and handed to the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub demographics: Demographics,
    pub phq9: BagRule,
    pub gad7: BagRule,
    pub audit: BagRule,
    pub nicotine: NicotineRule,
    pub findrisc: FindriscRule,
    pub score2: Score2Rule,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            demographics: Demographics::default(),
            phq9: Phq9::default_rule(),
            gad7: Gad7::default_rule(),
            audit: Audit::default_rule(),
            nicotine: Nicotine::default_rule(),
            findrisc: Findrisc::default_rule(),
            score2: Score2::default_rule(),
        }
    }
}

impl ScoringConfig {
    /// Check the tables an operator may have overridden.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        for (instrument, tag) in [
            (InstrumentId::Phq9, &self.phq9.columns.tag),
            (InstrumentId::Gad7, &self.gad7.columns.tag),
            (InstrumentId::Audit, &self.audit.columns.tag),
            (InstrumentId::Nicotine, &self.nicotine.columns.tag),
        ] {
            if tag.trim().is_empty() {
                return Err(InstrumentError::EmptyTag { instrument });
            }
        }

        for (instrument, scale) in [
            (InstrumentId::Phq9, &self.phq9.scale),
            (InstrumentId::Gad7, &self.gad7.scale),
            (InstrumentId::Audit, &self.audit.scale),
            (InstrumentId::Nicotine, &self.nicotine.scale),
            (InstrumentId::Findrisc, &self.findrisc.scale),
        ] {
            validate_scale(instrument, scale)?;
        }

        for (instrument, name, bands) in [
            (InstrumentId::Nicotine, "count_bands", &self.nicotine.count_bands),
            (InstrumentId::Findrisc, "age_bands", &self.findrisc.age_bands),
            (InstrumentId::Findrisc, "bmi_bands", &self.findrisc.bmi_bands),
            (InstrumentId::Findrisc, "waist_male", &self.findrisc.waist_male),
            (InstrumentId::Findrisc, "waist_other", &self.findrisc.waist_other),
        ] {
            validate_bands(instrument, name, bands)?;
        }

        Ok(())
    }

    /// Label fragment of the answer a correction field overrides.
    pub fn correction_fragment(&self, field: CorrectionField) -> &str {
        match field {
            CorrectionField::NonHdlCholesterol => &self.score2.cholesterol_fragment,
            CorrectionField::SystolicPressure => &self.score2.sbp_fragment,
            CorrectionField::Bmi => &self.findrisc.bmi_fragment,
            CorrectionField::WaistCircumference => &self.findrisc.waist_fragment,
        }
    }
}

fn validate_scale(instrument: InstrumentId, scale: &VerdictScale) -> Result<(), InstrumentError> {
    if scale.0.windows(2).any(|w| w[0].min <= w[1].min) {
        return Err(InstrumentError::UnorderedBands { instrument });
    }
    match scale.0.last() {
        Some(band) if band.min == 0 => Ok(()),
        _ => Err(InstrumentError::MissingFloorBand { instrument }),
    }
}

fn validate_bands(
    instrument: InstrumentId,
    name: &str,
    bands: &NumericBands,
) -> Result<(), InstrumentError> {
    let invalid = || InstrumentError::InvalidNumericBands {
        instrument,
        name: name.to_string(),
    };

    let Some((tail, bounded)) = bands.0.split_last() else {
        return Err(invalid());
    };
    if tail.up_to.is_some() || bounded.iter().any(|b| b.up_to.is_none()) {
        return Err(invalid());
    }
    let ascending = bounded
        .windows(2)
        .all(|w| matches!((w[0].up_to, w[1].up_to), (Some(a), Some(b)) if a < b));
    if !ascending {
        return Err(invalid());
    }
    Ok(())
}
