use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::types::Plan;

/// Session token claims. `sub` is the identity provider's user id; the plan
/// is carried either as `plan` or as Clerk's billing claim `pla`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pla: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, plan: Plan, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id.into(),
            plan: Some(plan.as_str().to_string()),
            pla: None,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn plan(&self) -> Plan {
        Plan::from_claim(self.plan.as_deref().or(self.pla.as_deref()))
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// Sign a development token with the shared HS256 secret
pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a bearer token and extract its claims. RS256 is used when a public
/// key is configured, HS256 with the shared secret otherwise.
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    let (decoding_key, validation) = match security.jwt_public_key_pem.as_deref() {
        Some(pem) => {
            let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                .map_err(|e| JwtError::InvalidToken(format!("bad public key: {}", e)))?;
            (key, Validation::new(Algorithm::RS256))
        }
        None => {
            if security.jwt_secret.is_empty() {
                return Err(JwtError::InvalidSecret);
            }
            (
                DecodingKey::from_secret(security.jwt_secret.as_bytes()),
                Validation::new(Algorithm::HS256),
            )
        }
    };

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}
