use thiserror::Error;

/// Error type for JWT operations.
///
/// `Malformed`, `SignatureMismatch` and `Expired` are verification outcomes;
/// `EncodingFailed` is an infrastructure fault on the issuing side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    Expired,
}
