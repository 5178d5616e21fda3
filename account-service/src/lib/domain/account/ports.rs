use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::domain::account::models::AuthenticationResult;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::models::UserCredential;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Successful result, or a failed result when the email is already registered
    ///
    /// # Errors
    /// * `Password` - Secure random source or hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthenticationResult, AccountError>;

    /// Check credentials and issue an access token.
    ///
    /// # Arguments
    /// * `command` - Raw email and password
    ///
    /// # Returns
    /// Result carrying the token, or a failed result with the generic
    /// invalid-credentials message
    ///
    /// # Errors
    /// * `Token` - Token signing failed
    /// * `CorruptRecord` / `Password` - Stored credential cannot be checked
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, AccountError>;
}

/// Outcome of an atomic insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Persistence operations for credential records.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Retrieve a credential by email address.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<UserCredential>, AccountError>;

    /// Store a credential unless one already exists for its email.
    ///
    /// Check and insert happen atomically: of two concurrent inserts for the
    /// same email, exactly one reports `Inserted`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn insert_if_absent(&self, credential: UserCredential)
        -> Result<InsertOutcome, AccountError>;
}
