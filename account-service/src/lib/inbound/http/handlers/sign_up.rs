use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::EmailError;
use crate::domain::account::models::AuthenticationResult;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::extract::JsonOrForm;
use crate::inbound::http::router::AppState;

/// Register an account.
///
/// A duplicate email is a normal outcome: HTTP 200 with `success: false`.
pub async fn sign_up<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    JsonOrForm(body): JsonOrForm<SignUpRequest>,
) -> Result<ApiSuccess<AuthenticationResult>, ApiError> {
    state
        .auth_service
        .sign_up(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result))
}

/// HTTP request body for signing up (raw JSON or form)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, ParseSignUpRequestError> {
        let email = EmailAddress::new(self.email)?;
        Ok(SignUpCommand::new(email, self.password))
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
