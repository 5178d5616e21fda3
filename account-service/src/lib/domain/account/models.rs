use std::fmt;
use std::str::FromStr;

use auth::SaltedPassword;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::account::errors::AuthenticationFailure;
use crate::account::errors::EmailError;

/// Stored credential record for one account.
///
/// Exactly one record exists per email. Hash and salt live together in
/// `password` and are never updated independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub email: EmailAddress,
    pub password: SaltedPassword,
    pub is_admin: bool,
}

impl UserCredential {
    /// Create the credential for a newly registered, non-admin account.
    pub fn new(email: EmailAddress, password: SaltedPassword) -> Self {
        Self {
            email,
            password,
            is_admin: false,
        }
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored and
/// compared exactly as given (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl SignUpCommand {
    /// Construct a new sign-up command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Command to log in with raw, unvalidated credentials.
///
/// The email is validated by the service so that a malformed address fails
/// exactly like an unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Outcome of a sign-up or login attempt, returned directly to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthenticationResult {
    pub const SIGNED_UP: &'static str = "Successfully created new user.";
    pub const AUTHENTICATED: &'static str = "Enjoy your token!";

    pub fn signed_up() -> Self {
        Self {
            success: true,
            message: Self::SIGNED_UP.to_string(),
            token: None,
        }
    }

    pub fn authenticated(token: String) -> Self {
        Self {
            success: true,
            message: Self::AUTHENTICATED.to_string(),
            token: Some(token),
        }
    }

    pub fn failed(failure: AuthenticationFailure) -> Self {
        Self {
            success: false,
            message: failure.to_string(),
            token: None,
        }
    }
}

impl From<AuthenticationFailure> for AuthenticationResult {
    fn from(failure: AuthenticationFailure) -> Self {
        Self::failed(failure)
    }
}

/// Identity recovered from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<auth::Claims> for AuthenticatedUser {
    fn from(claims: auth::Claims) -> Self {
        Self {
            expires_at: claims.expires_at(),
            email: claims.sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_user_from_claims_without_iat() {
        let claims = auth::Claims {
            sub: "a@x.com".to_string(),
            iat: None,
            exp: 1_700_000_000,
        };

        let user = AuthenticatedUser::from(claims);

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.expires_at, DateTime::from_timestamp(1_700_000_000, 0));
    }

    #[test]
    fn test_email_address_valid() {
        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "a@x.com");
    }

    #[test]
    fn test_email_address_keeps_case() {
        let email = EmailAddress::new("Alice@Example.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "Alice@Example.com");
        assert_ne!(email, EmailAddress::new("alice@example.com".to_string()).unwrap());
    }

    #[test]
    fn test_email_address_invalid() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new(String::new()).is_err());
    }

    #[test]
    fn test_new_credential_is_not_admin() {
        let credential = UserCredential::new(
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            SaltedPassword {
                hash: "00".to_string(),
                salt: "11".to_string(),
            },
        );
        assert!(!credential.is_admin);
    }

    #[test]
    fn test_result_serialization_omits_missing_token() {
        let value = serde_json::to_value(AuthenticationResult::signed_up()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": true,
                "message": "Successfully created new user."
            })
        );

        let value =
            serde_json::to_value(AuthenticationResult::authenticated("abc".to_string())).unwrap();
        assert_eq!(value["token"], "abc");
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            AuthenticationResult::from(AuthenticationFailure::AlreadyExists).message,
            "Signin failed. User already exists."
        );
        assert_eq!(
            AuthenticationResult::from(AuthenticationFailure::InvalidCredentials).message,
            "Authentication failed. User or password incorrect."
        );
    }
}
