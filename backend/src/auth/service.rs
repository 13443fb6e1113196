//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::User;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtUtils;
use chrono::Duration;
use sqlx::SqlitePool;
use tracing::debug;
use validator::Validate;

/// Authentication service for handling login and token verification
pub struct AuthService<'a> {
    jwt_utils: JwtUtils,
    user_service: UserService<'a>,
    config: &'a Config,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, config: &'a Config) -> Self {
        AuthService {
            jwt_utils: JwtUtils::new(&config.jwt_secret),
            user_service: UserService::new(pool, config.bcrypt_cost),
            config,
        }
    }

    /// Authenticate user and issue an access token
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<TokenResponse> {
        if login_request.validate().is_err() {
            return Err(ServiceError::unauthorized("Incorrect username or password"));
        }

        let user = self
            .user_service
            .authenticate_user(&login_request.username, &login_request.password)
            .await?;

        let access_token = self
            .jwt_utils
            .generate_token(
                &user.username,
                Some(Duration::minutes(self.config.access_token_expire_minutes)),
            )
            .map_err(|e| ServiceError::internal_error(e.to_string()))?;

        Ok(TokenResponse::bearer(access_token))
    }

    /// Resolves a bearer token to the user it was issued for.
    ///
    /// # Errors
    /// `ServiceError::Unauthorized` when the token is invalid, expired, or its
    /// subject no longer exists.
    pub async fn verify_token(&self, token: &str) -> ServiceResult<User> {
        let claims = self.jwt_utils.validate_token(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            credentials_error()
        })?;

        self.user_service
            .get_user_by_username(claims.username())
            .await?
            .ok_or_else(credentials_error)
    }
}

fn credentials_error() -> ServiceError {
    ServiceError::unauthorized("Could not validate credentials")
}
