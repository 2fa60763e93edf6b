use thiserror::Error;

use screening_core::models::patient::InstrumentId;

/// Problems with a scoring configuration loaded from outside the binary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstrumentError {
    #[error("{instrument}: verdict bands must be ordered most severe first")]
    UnorderedBands { instrument: InstrumentId },

    #[error("{instrument}: verdict bands must end with a band starting at 0")]
    MissingFloorBand { instrument: InstrumentId },

    #[error("{instrument}: numeric bands '{name}' must ascend and end unbounded")]
    InvalidNumericBands {
        instrument: InstrumentId,
        name: String,
    },

    #[error("{instrument}: empty column tag")]
    EmptyTag { instrument: InstrumentId },
}
