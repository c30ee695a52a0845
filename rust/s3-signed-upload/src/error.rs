//! Error types for POST policy signing.

use thiserror::Error;

use crate::Field;

/// A required [`UploadRequest`](crate::UploadRequest) input is empty or zero.
///
/// Fields are checked in a fixed order and only the first missing one is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The named field was empty (strings) or zero (size, expiration).
    #[error("{0} is required")]
    MissingField(Field),
}

impl ValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            Self::MissingField(field) => *field,
        }
    }
}

/// Errors returned by [`PolicySigner::sign`](crate::PolicySigner::sign).
#[derive(Debug, Error)]
pub enum SignError {
    /// The upload request is incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Adding the expiration to the signing instant overflows the
    /// representable UTC range, or lands outside years 0000 through 9999
    /// that the fixed-width policy timestamps can express.
    #[error("expiration is out of range")]
    ExpirationOutOfRange,

    /// The policy document could not be serialized.
    #[error("failed to encode policy: {0}")]
    Encoding(#[from] serde_json::Error),
}
