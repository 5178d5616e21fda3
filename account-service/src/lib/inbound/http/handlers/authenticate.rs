use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::AuthenticationResult;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::extract::JsonOrForm;
use crate::inbound::http::router::AppState;

/// Exchange credentials for an access token.
///
/// Failed logins are HTTP 200 with `success: false` and one generic message.
pub async fn authenticate<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    JsonOrForm(body): JsonOrForm<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticationResult>, ApiError> {
    state
        .auth_service
        .login(LoginCommand::new(body.email, body.password))
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    email: String,
    password: String,
}
