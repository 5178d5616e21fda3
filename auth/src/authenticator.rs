use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::SaltedPassword;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds the signing secret and token lifetime for the whole process; built
/// once at startup and shared behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Default access token lifetime.
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

    /// Create a new authenticator with the default token lifetime and salt length.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_settings(
            jwt_secret,
            Duration::hours(Self::DEFAULT_TOKEN_TTL_HOURS),
            PasswordHasher::new(),
        )
    }

    /// Create an authenticator with an explicit token lifetime and hasher.
    pub fn with_settings(
        jwt_secret: &[u8],
        token_ttl: Duration,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            password_hasher,
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password under a freshly generated salt.
    ///
    /// # Errors
    /// * `PasswordError` - Salt generation or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<SaltedPassword, PasswordError> {
        self.password_hasher.hash_with_new_salt(password)
    }

    /// Verify credentials and generate a JWT token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored` - Stored password hash and salt
    /// * `subject` - Identity placed in the token's `sub` claim
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored: &SaltedPassword,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self
            .password_hasher
            .verify(password, &stored.salt, &stored.hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Generate a JWT token without password verification.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, subject: &str) -> Result<String, JwtError> {
        self.jwt_handler.issue(subject, self.token_ttl)
    }

    /// Validate and decode a JWT token.
    ///
    /// # Errors
    /// * `Malformed`, `SignatureMismatch` or `Expired`
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }
}
