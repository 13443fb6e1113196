//! Data structures for authentication-related entities.

use crate::database::models::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Access token issued by `/token`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// The authenticated caller, placed in request extensions by `jwt_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);
