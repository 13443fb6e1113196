//! Handler functions for email template CRUD endpoints.

use crate::api::common::{ApiError, ApiJson, ApiPath};
use crate::database::models::{EmailTemplate, EmailTemplatePayload};
use crate::services::email_template_service::EmailTemplateService;
use axum::extract::{Extension, Json};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn list_templates(
    Extension(pool): Extension<SqlitePool>,
) -> Result<Json<Vec<EmailTemplate>>, ApiError> {
    let templates = EmailTemplateService::new(&pool).list_templates().await?;
    Ok(Json(templates))
}

#[axum::debug_handler]
pub async fn create_template(
    Extension(pool): Extension<SqlitePool>,
    ApiJson(payload): ApiJson<EmailTemplatePayload>,
) -> Result<Json<EmailTemplate>, ApiError> {
    let template = EmailTemplateService::new(&pool)
        .create_template(payload)
        .await?;
    Ok(Json(template))
}

#[axum::debug_handler]
pub async fn get_template(
    Extension(pool): Extension<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<EmailTemplate>, ApiError> {
    let template = EmailTemplateService::new(&pool)
        .get_template_required(id)
        .await?;
    Ok(Json(template))
}

#[axum::debug_handler]
pub async fn update_template(
    Extension(pool): Extension<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<EmailTemplatePayload>,
) -> Result<Json<EmailTemplate>, ApiError> {
    let template = EmailTemplateService::new(&pool)
        .update_template(id, payload)
        .await?;
    Ok(Json(template))
}
