use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub(crate) enum TokenError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Claims {
    pub(crate) uid: Uuid,
    pub(crate) email: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

/// Access and refresh tokens carry the same claims and differ only in TTL.
#[derive(Debug, Clone)]
pub(crate) struct TokenPair {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

/// Issues and verifies HS256 tokens with a secret fixed at startup.
#[derive(Clone)]
pub(crate) struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
    const DEFAULT_REFRESH_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

    pub(crate) fn new(secret: &str, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        let access_ttl_seconds = if access_ttl_seconds > 0 {
            access_ttl_seconds
        } else {
            Self::DEFAULT_ACCESS_TTL_SECONDS
        };
        let refresh_ttl_seconds = if refresh_ttl_seconds > 0 {
            refresh_ttl_seconds
        } else {
            Self::DEFAULT_REFRESH_TTL_SECONDS
        };

        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_seconds),
            refresh_ttl: Duration::seconds(refresh_ttl_seconds),
        }
    }

    pub(crate) fn issue(&self, uid: Uuid, email: &str, ttl: Duration) -> Result<String, TokenError> {
        let issued_at = Utc::now();
        let claims = Claims {
            uid,
            email: email.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    pub(crate) fn issue_pair(&self, uid: Uuid, email: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(uid, email, self.access_ttl)?,
            refresh_token: self.issue(uid, email, self.refresh_ttl)?,
        })
    }

    pub(crate) fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(TokenError::Decode)?;

        // jsonwebtoken still accepts exp == now
        if token_data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
