use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{self, SecurityConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails when `expiry_hours` does not fit a chrono timestamp.
    pub fn new(username: impl Into<String>, is_admin: bool, expiry_hours: u64) -> Result<Self, TokenError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(TokenError::ExpiryOutOfRange(expiry_hours))?;

        Ok(Self {
            username: username.into(),
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT expiry of {0} hours is out of range")]
    ExpiryOutOfRange(u64),

    #[error("JWT generation error: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Issue a signed token for `username` using the global configuration.
pub fn create_token(username: &str, is_admin: bool) -> Result<String, TokenError> {
    create_token_with(&config::config().security, username, is_admin)
}

pub fn create_token_with(security: &SecurityConfig, username: &str, is_admin: bool) -> Result<String, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let claims = Claims::new(username, is_admin, security.jwt_expiry_hours)?;
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key).map_err(TokenError::Encode)
}

/// Verify signature and expiry and return the claims.
pub fn decode_token(token: &str) -> Result<Claims, TokenError> {
    decode_token_with(&config::config().security, token)
}

pub fn decode_token_with(security: &SecurityConfig, token: &str) -> Result<Claims, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(TokenError::Decode)?;

    Ok(token_data.claims)
}
