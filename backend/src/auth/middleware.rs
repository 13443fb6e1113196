//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer token, re-resolves its subject and exposes the caller
//! to handlers as a `CurrentUser` extension.

use crate::api::common::ApiError;
use crate::auth::models::CurrentUser;
use crate::auth::service::AuthService;
use crate::config::Config;
use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?
        .to_string();

    let user = AuthService::new(&pool, &config).verify_token(&token).await?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
