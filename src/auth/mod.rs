pub mod password;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::{ConfigError, SecurityConfig, MAX_JWT_EXPIRY_HOURS};

pub use password::PasswordHasher;

/// Token payload: the user id plus issue and expiry timestamps
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token claims have an unexpected shape")]
    ClaimTypeError,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and validates HS256 identity tokens.
///
/// There is no revocation list: a token stays valid until `exp`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, ConfigError> {
        let hours = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .filter(|h| (1..=MAX_JWT_EXPIRY_HOURS as i64).contains(h))
            .ok_or_else(|| ConfigError::Invalid {
                key: "JWT_EXPIRY_HOURS",
                reason: format!("must be between 1 and {}", MAX_JWT_EXPIRY_HOURS),
            })?;

        Ok(Self::new(&security.jwt_secret, Duration::hours(hours)))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i32, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, issued_at, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<i32, TokenError> {
        check_header(token)?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::ClaimTypeError,
                _ => TokenError::Malformed,
            }
        })?;

        Ok(data.claims.user_id)
    }
}

/// Classifies the JOSE header before the claims are looked at.
/// An algorithm other than HS256 (`none` included) is a signature failure;
/// a header that is not a JSON object is a malformed token.
fn check_header(token: &str) -> Result<(), TokenError> {
    let segment = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|_| TokenError::Malformed)?;
    let header: Value = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    match header.get("alg").and_then(Value::as_str) {
        Some("HS256") => {}
        Some(_) => return Err(TokenError::InvalidSignature),
        None => return Err(TokenError::Malformed),
    }

    decode_header(token).map_err(|_| TokenError::Malformed)?;
    Ok(())
}
