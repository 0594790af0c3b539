use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("JWT token expired")]
    Expired,
}

/// HS256 signing and verification with a fixed token lifetime
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<(String, Claims), JwtError> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(JwtError::TokenGeneration)?;
        Ok((token, claims))
    }

    /// Verify the signature and decode the claims. A token is expired from its `exp`
    /// second onwards, with no leeway.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(JwtError::Invalid)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(JwtError::Expired);
        }
        Ok(claims)
    }
}
