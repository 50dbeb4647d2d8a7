use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub mod avatar;
pub mod password;

// Ten years; keeps `iat + expiry` well inside chrono's range.
const MAX_EXPIRY_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Identifies the account a token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            user: TokenUser { id: user_id },
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Signs and checks HS256 session tokens with the server-held secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expires_in: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, expires_in_secs: u64) -> Self {
        let secs = i64::try_from(expires_in_secs.min(MAX_EXPIRY_SECS)).unwrap_or(0);
        Self {
            secret: secret.into(),
            expires_in: Duration::seconds(secs),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_secs)
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let claims = Claims::new(user_id, self.expires_in);
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Checks signature and expiry and hands back the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_carries_user_id() {
        let issuer = TokenIssuer::new("test-secret", 36_000);
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.user.id, user_id);
        assert_eq!(claims.exp - claims.iat, 36_000);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let issuer = TokenIssuer::new("", 60);
        assert!(matches!(issuer.issue(Uuid::new_v4()), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn token_from_another_secret_fails_verification() {
        let token = TokenIssuer::new("one", 60).issue(Uuid::new_v4()).unwrap();
        let result = TokenIssuer::new("two", 60).verify(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn claims_serialize_with_nested_user() {
        let id = Uuid::new_v4();
        let value = serde_json::to_value(Claims::new(id, Duration::seconds(10))).unwrap();
        assert_eq!(value["user"]["id"], id.to_string());
        assert!(value["exp"].is_i64());
    }

    #[test]
    fn debug_output_hides_secret() {
        let issuer = TokenIssuer::new("hunter2-secret", 60);
        assert!(!format!("{:?}", issuer).contains("hunter2"));
    }
}
