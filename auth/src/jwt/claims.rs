use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT claims carried by an access token.
///
/// Only the registered claims needed to identify the bearer and bound the
/// token lifetime are used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the authenticated user's email)
    pub sub: String,

    /// Issued at (Unix timestamp), absent in tokens minted elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry is not representable
    pub fn for_subject(subject: impl ToString, ttl: Duration) -> Result<Self, JwtError> {
        Self::issued_at(subject, Utc::now(), ttl)
    }

    /// Create claims for `subject` issued at `issued_at` and valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry is not representable
    pub fn issued_at(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expiration = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!("token lifetime of {} overflows", ttl))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: Some(issued_at.timestamp()),
            exp: expiration.timestamp(),
        })
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the instant of its `exp` claim.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("a@x.com", Duration::hours(24)).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.exp - claims.iat.unwrap(), 24 * 60 * 60);
    }

    #[test]
    fn test_issued_at() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at("a@x.com", issued, Duration::seconds(60)).unwrap();

        assert_eq!(claims.iat, Some(1_700_000_000));
        assert_eq!(claims.exp, 1_700_000_060);
        assert_eq!(claims.expires_at(), DateTime::from_timestamp(1_700_000_060, 0));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "a@x.com".to_string(),
            iat: Some(0),
            exp: 1000,
        };

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_serialized_claim_names() {
        let claims = Claims {
            sub: "a@x.com".to_string(),
            iat: Some(10),
            exp: 20,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["sub"], "a@x.com");
        assert_eq!(value["iat"], 10);
        assert_eq!(value["exp"], 20);
    }

    #[test]
    fn test_missing_iat_deserializes() {
        let claims: Claims = serde_json::from_str(r#"{"sub":"a@x.com","exp":20}"#).unwrap();

        assert_eq!(claims.iat, None);
        assert_eq!(claims.exp, 20);

        let value = serde_json::to_value(&claims).unwrap();
        assert!(value.get("iat").is_none());
    }

    #[test]
    fn test_overflowing_ttl_is_rejected() {
        let result = Claims::for_subject("a@x.com", Duration::MAX);

        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }
}
