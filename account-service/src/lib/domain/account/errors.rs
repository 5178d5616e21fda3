use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Expected business outcomes of sign-up and login.
///
/// These are reported to the caller as a structured result, never as a fault.
/// The display strings are part of the wire contract.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthenticationFailure {
    #[error("Signin failed. User already exists.")]
    AlreadyExists,

    /// Shared by unknown email and wrong password.
    #[error("Authentication failed. User or password incorrect.")]
    InvalidCredentials,
}

/// Infrastructure failures of account operations.
///
/// None of these are authentication outcomes; they propagate to the
/// caller as faults.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Stored record is invalid: {0}")]
    CorruptRecord(String),
}

impl From<EmailError> for AccountError {
    fn from(err: EmailError) -> Self {
        AccountError::CorruptRecord(err.to_string())
    }
}
