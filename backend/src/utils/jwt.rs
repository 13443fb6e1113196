//! JWT token utilities for authentication.
//!
//! Provides token creation and validation for bearer authentication. Tokens
//! are HS256-signed, carry the username as subject and expire; nothing about
//! them is stored server-side.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime used when the caller does not ask for one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Token generation failed: {0}")]
    Encoding(String),
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the signing secret
    pub fn new(secret: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generate a token for `username`.
    ///
    /// Without a `ttl` the token lives for [`DEFAULT_TOKEN_TTL_MINUTES`].
    pub fn generate_token(&self, username: &str, ttl: Option<Duration>) -> Result<String, TokenError> {
        self.generate_token_at(username, ttl, Utc::now())
    }

    pub(crate) fn generate_token_at(
        &self,
        username: &str,
        ttl: Option<Duration>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES));
        let exp = issued_at + ttl;

        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp().max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate() {
        let jwt = JwtUtils::new("test-secret");
        let token = jwt.generate_token("ada", Some(Duration::minutes(30))).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.username(), "ada");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_default_ttl_is_fifteen_minutes() {
        let jwt = JwtUtils::new("test-secret");
        let token = jwt.generate_token("ada", None).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let jwt = JwtUtils::new("test-secret");
        let ttl = Duration::minutes(30);

        let still_valid = jwt
            .generate_token_at("ada", Some(ttl), Utc::now() - Duration::minutes(29))
            .unwrap();
        assert!(jwt.validate_token(&still_valid).is_ok());

        let expired = jwt
            .generate_token_at("ada", Some(ttl), Utc::now() - Duration::minutes(31))
            .unwrap();
        assert_eq!(jwt.validate_token(&expired), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtUtils::new("one-secret").generate_token("ada", None).unwrap();

        let result = JwtUtils::new("another-secret").validate_token(&token);
        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let jwt = JwtUtils::new("test-secret");

        assert!(matches!(
            jwt.validate_token("not.a.token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(jwt.validate_token(""), Err(TokenError::Malformed(_))));
    }
}
