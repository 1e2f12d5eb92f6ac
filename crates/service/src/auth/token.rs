//! HS256 session tokens. The subject is the user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue(secret: &str, user_id: Uuid, username: &str, ttl_hours: i64) -> Result<(String, i64), AuthError> {
    let now = Utc::now();
    let exp = (now + Duration::hours(ttl_hours)).timestamp();
    let claims = Claims { sub: user_id, username: username.to_string(), iat: now.timestamp(), exp };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    Ok((token, exp))
}

/// Verify signature and expiry.
pub fn verify(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            AuthError::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef-test";

    #[test]
    fn issued_token_verifies() {
        let id = Uuid::new_v4();
        let (token, exp) = issue(SECRET, id, "ann", 1).unwrap();
        let claims = verify(SECRET, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "ann");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = issue(SECRET, Uuid::new_v4(), "ann", 1).unwrap();
        assert!(matches!(verify("another-secret-entirely", &token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let (token, _) = issue(SECRET, Uuid::new_v4(), "ann", -2).unwrap();
        assert!(matches!(verify(SECRET, &token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(verify(SECRET, "not.a.jwt"), Err(AuthError::InvalidToken)));
    }
}
