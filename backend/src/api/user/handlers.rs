//! Handler functions for user registration and management API endpoints.

use crate::api::common::{ApiError, ApiJson, ApiQuery, PaginationFilter, service_error_to_http};
use crate::auth::models::CurrentUser;
use crate::config::Config;
use crate::database::models::{CreateNewUser, UserResponse};
use crate::services::user_service::UserService;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Registers a new user.
#[axum::debug_handler]
pub async fn create_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    ApiJson(payload): ApiJson<CreateNewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let service = UserService::new(&pool, config.bcrypt_cost);

    match service.register(payload).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user.into()))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Returns the authenticated caller.
#[axum::debug_handler]
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(user.into())
}

/// Lists users; the total row count is sent in `X-Total-Count`.
#[axum::debug_handler]
pub async fn list_users(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    ApiQuery(pagination): ApiQuery<PaginationFilter>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Listing users for {}", caller.username);

    let service = UserService::new(&pool, config.bcrypt_cost);
    let users = service.list_users(&pagination).await?;
    let total = service.count_users().await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(([("x-total-count", total.to_string())], Json(users)))
}
