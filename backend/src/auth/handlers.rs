//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse the login form and delegate to `auth::service`.

use crate::api::common::{ApiError, ApiForm};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::config::Config;
use axum::{
    extract::Extension,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Exchange username and password for a bearer token
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    ApiForm(payload): ApiForm<LoginRequest>,
) -> Result<ResponseJson<TokenResponse>, ApiError> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => {
            tracing::info!("Login rejected: {}", error);
            Err(error.into())
        }
    }
}
