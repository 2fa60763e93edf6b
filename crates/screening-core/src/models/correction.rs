use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::patient::InstrumentId;
use crate::identity::Identity;

/// A measurement that can arrive late through the correction channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CorrectionField {
    NonHdlCholesterol,
    SystolicPressure,
    Bmi,
    WaistCircumference,
}

impl CorrectionField {
    /// Instruments whose result changes when this field changes.
    pub fn dependents(self) -> &'static [InstrumentId] {
        match self {
            CorrectionField::NonHdlCholesterol | CorrectionField::SystolicPressure => {
                &[InstrumentId::Score2]
            }
            CorrectionField::Bmi | CorrectionField::WaistCircumference => &[InstrumentId::Findrisc],
        }
    }
}

/// One honored row of the correction store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CorrectionEntry {
    pub identity: Identity,
    pub field: CorrectionField,
    pub value: f64,
}
