//! Email template business logic.

use crate::database::models::{EmailTemplate, EmailTemplatePayload};
use crate::errors::{ServiceError, ServiceResult, is_unique_violation};
use crate::repositories::email_template_repository::EmailTemplateRepository;
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

pub struct EmailTemplateService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmailTemplateService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a template; names are unique.
    pub async fn create_template(
        &self,
        payload: EmailTemplatePayload,
    ) -> ServiceResult<EmailTemplate> {
        payload.validate()?;

        let repo = EmailTemplateRepository::new(self.pool);
        if repo.get_template_by_name(&payload.name).await?.is_some() {
            return Err(ServiceError::already_exists("Template name already exists"));
        }

        let template = repo.create_template(payload).await.map_err(duplicate_name)?;
        info!("Created email template '{}' ({})", template.name, template.id);
        Ok(template)
    }

    /// Replaces an existing template.
    pub async fn update_template(
        &self,
        id: i64,
        payload: EmailTemplatePayload,
    ) -> ServiceResult<EmailTemplate> {
        payload.validate()?;

        let repo = EmailTemplateRepository::new(self.pool);
        if let Some(existing) = repo.get_template_by_name(&payload.name).await? {
            if existing.id != id {
                return Err(ServiceError::already_exists("Template name already exists"));
            }
        }

        repo.update_template(id, payload)
            .await
            .map_err(duplicate_name)?
            .ok_or_else(|| ServiceError::not_found("Template", id))
    }

    /// Fetches a template or fails with `NotFound`.
    pub async fn get_template_required(&self, id: i64) -> ServiceResult<EmailTemplate> {
        let repo = EmailTemplateRepository::new(self.pool);
        repo.get_template_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Template", id))
    }

    pub async fn list_templates(&self) -> ServiceResult<Vec<EmailTemplate>> {
        let repo = EmailTemplateRepository::new(self.pool);
        Ok(repo.list_templates().await?)
    }
}

fn duplicate_name(error: anyhow::Error) -> ServiceError {
    if is_unique_violation(&error) {
        ServiceError::already_exists("Template name already exists")
    } else {
        error.into()
    }
}
