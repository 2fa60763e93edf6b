use thiserror::Error;

/// Why a raw record could not be turned into an [`Identity`](crate::identity::Identity).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("missing full name")]
    MissingName,

    #[error("missing date of birth")]
    MissingDate,

    #[error("unparsable date of birth: {0:?}")]
    UnparsableDate(String),
}
