use axum::async_trait;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Form;
use axum::Json;
use serde::de::DeserializeOwned;

use super::handlers::ApiError;

/// Request body accepted as either JSON or `application/x-www-form-urlencoded`.
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

/// Whether the request declares a urlencoded form body.
pub fn is_form(headers: &HeaderMap) -> bool {
    content_type(headers).starts_with("application/x-www-form-urlencoded")
}

/// Whether the request declares a JSON body (`application/json` or `+json`).
pub fn is_json(headers: &HeaderMap) -> bool {
    let mime = content_type(headers)
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    mime == "application/json" || mime.ends_with("+json")
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::UnprocessableEntity(rejection.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::UnprocessableEntity(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Credentials {
        email: String,
        password: String,
    }

    #[tokio::test]
    async fn test_extracts_json_body() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"a@x.com","password":"pw1"}"#))
            .unwrap();

        let JsonOrForm(body) = JsonOrForm::<Credentials>::from_request(req, &())
            .await
            .unwrap();

        assert_eq!(body.email, "a@x.com");
        assert_eq!(body.password, "pw1");
    }

    #[tokio::test]
    async fn test_extracts_form_body() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40x.com&password=pw1"))
            .unwrap();

        let JsonOrForm(body) = JsonOrForm::<Credentials>::from_request(req, &())
            .await
            .unwrap();

        assert_eq!(body.email, "a@x.com");
        assert_eq!(body.password, "pw1");
    }

    #[tokio::test]
    async fn test_rejects_missing_fields() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"a@x.com"}"#))
            .unwrap();

        let result = JsonOrForm::<Credentials>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError::UnprocessableEntity(_))));
    }

    #[test]
    fn test_content_type_detection() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());
        assert!(is_json(&headers));
        assert!(!is_form(&headers));

        headers.insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        assert!(is_form(&headers));
        assert!(!is_json(&headers));
    }
}
