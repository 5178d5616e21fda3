use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::body::Body;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Deserialize;
use thiserror::Error;

use super::extract::is_form;
use super::extract::is_json;
use super::handlers::ApiError;
use crate::domain::account::models::AuthenticatedUser;

/// Header carrying the access token when it is not in the body or query.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Largest request body buffered while looking for a `token` field.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Reasons a protected request is turned away before reaching its handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenRejection {
    /// No credential in the request: a client error, not a failed login.
    #[error("No token provided.")]
    Absent,

    #[error("Failed to authenticate token.")]
    Invalid(#[source] JwtError),
}

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        match self {
            TokenRejection::Absent => ApiError::Forbidden(self.to_string()).into_response(),
            TokenRejection::Invalid(_) => ApiError::Unauthorized(self.to_string()).into_response(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TokenField {
    #[serde(default)]
    token: Option<String>,
}

impl TokenField {
    fn into_token(self) -> Option<String> {
        self.token.filter(|token| !token.is_empty())
    }
}

/// Middleware that validates access tokens and adds the identity to request extensions
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let (parts, body) = req.into_parts();

    // The body is buffered to look for a token and then handed on intact.
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to read request body");
            ApiError::BadRequest("Invalid request body.".to_string()).into_response()
        })?;

    let token = extract_token(&parts, &bytes).ok_or_else(|| {
        tracing::warn!(path = %parts.uri.path(), "Request rejected, no token provided");
        TokenRejection::Absent.into_response()
    })?;

    let claims = authenticator.validate_token(&token).map_err(|e| {
        tracing::warn!(path = %parts.uri.path(), error = %e, "Token validation failed");
        TokenRejection::Invalid(e).into_response()
    })?;

    let mut req = Request::from_parts(parts, Body::from(bytes));
    req.extensions_mut().insert(AuthenticatedUser::from(claims));

    Ok(next.run(req).await)
}

/// Find the access token in a request.
///
/// Precedence: `token` body field, then `token` query parameter, then the
/// `x-access-token` header. Empty values count as absent.
pub fn extract_token(parts: &Parts, body: &[u8]) -> Option<String> {
    token_from_body(&parts.headers, body)
        .or_else(|| token_from_query(&parts.uri))
        .or_else(|| token_from_header(&parts.headers))
}

fn token_from_body(headers: &HeaderMap, body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    let field = if is_json(headers) {
        serde_json::from_slice::<TokenField>(body).ok()?
    } else if is_form(headers) {
        serde_urlencoded::from_bytes::<TokenField>(body).ok()?
    } else {
        return None;
    };

    field.into_token()
}

fn token_from_query(uri: &Uri) -> Option<String> {
    let Query(field) = Query::<TokenField>::try_from_uri(uri).ok()?;
    field.into_token()
}

fn token_from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|token| !token.is_empty())
}
