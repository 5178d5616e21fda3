use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::account::errors::AccountError;
use crate::account::errors::AuthenticationFailure;
use crate::account::ports::AuthServicePort;
use crate::account::ports::InsertOutcome;
use crate::account::ports::UserDirectory;
use crate::domain::account::models::AuthenticationResult;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::models::UserCredential;

/// Domain service implementation for sign-up and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
    authenticator: Arc<Authenticator>,
}

impl<UD> AuthService<UD>
where
    UD: UserDirectory,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Credential persistence implementation
    /// * `authenticator` - Hasher and token issuer bound to the process secret
    pub fn new(directory: Arc<UD>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            directory,
            authenticator,
        }
    }
}

#[async_trait]
impl<UD> AuthServicePort for AuthService<UD>
where
    UD: UserDirectory,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthenticationResult, AccountError> {
        if self
            .directory
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::warn!(email = %command.email, "Sign-up rejected, account already exists");
            return Ok(AuthenticationFailure::AlreadyExists.into());
        }

        let password = self.authenticator.hash_password(&command.password)?;
        let credential = UserCredential::new(command.email, password);
        let email = credential.email.clone();

        match self.directory.insert_if_absent(credential).await? {
            InsertOutcome::Inserted => {
                tracing::info!(email = %email, "Account created");
                Ok(AuthenticationResult::signed_up())
            }
            InsertOutcome::Duplicate => {
                tracing::warn!(
                    email = %email,
                    "Sign-up rejected, account created concurrently"
                );
                Ok(AuthenticationFailure::AlreadyExists.into())
            }
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, AccountError> {
        let Ok(email) = EmailAddress::new(command.email) else {
            tracing::warn!("Login rejected, malformed email");
            return Ok(AuthenticationFailure::InvalidCredentials.into());
        };

        let Some(credential) = self.directory.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Login rejected");
            return Ok(AuthenticationFailure::InvalidCredentials.into());
        };

        match self.authenticator.authenticate(
            &command.password,
            &credential.password,
            credential.email.as_str(),
        ) {
            Ok(result) => {
                tracing::info!(email = %email, "Login succeeded, token issued");
                Ok(AuthenticationResult::authenticated(result.access_token))
            }
            Err(auth::AuthenticationError::InvalidCredentials) => {
                tracing::warn!(email = %email, "Login rejected");
                Ok(AuthenticationFailure::InvalidCredentials.into())
            }
            Err(auth::AuthenticationError::PasswordError(e)) => Err(e.into()),
            Err(auth::AuthenticationError::JwtError(e)) => Err(e.into()),
        }
    }
}
