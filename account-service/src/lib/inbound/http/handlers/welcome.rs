use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::account::models::AuthenticatedUser;

/// Landing endpoint for authenticated callers.
pub async fn welcome(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<WelcomeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        WelcomeResponseData {
            success: true,
            message: "Welcome to the API.".to_string(),
            email: user.email,
            expires_at: user.expires_at,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WelcomeResponseData {
    pub success: bool,
    pub message: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_welcome_reports_identity() {
        let expires_at = DateTime::from_timestamp(1_700_000_000, 0);
        let user = AuthenticatedUser {
            email: "a@x.com".to_string(),
            expires_at,
        };

        let response = welcome(Extension(user)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.data().success);
        assert_eq!(response.data().email, "a@x.com");
        assert_eq!(response.data().expires_at, expires_at);
    }
}
