//! Database repository for email templates.

use crate::database::models::{EmailTemplate, EmailTemplatePayload};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct EmailTemplateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmailTemplateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new template.
    pub async fn create_template(&self, template: EmailTemplatePayload) -> Result<EmailTemplate> {
        let template = sqlx::query_as::<_, EmailTemplate>(
            r#"
            INSERT INTO email_templates (name, subject, body_html, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, subject, body_html, created_at
            "#,
        )
        .bind(template.name)
        .bind(template.subject)
        .bind(template.body_html)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(template)
    }

    /// Replaces name, subject and body of an existing template.
    ///
    /// # Returns
    /// `None` when no template has this id
    pub async fn update_template(
        &self,
        id: i64,
        template: EmailTemplatePayload,
    ) -> Result<Option<EmailTemplate>> {
        let template = sqlx::query_as::<_, EmailTemplate>(
            r#"
            UPDATE email_templates
            SET name = ?, subject = ?, body_html = ?
            WHERE id = ?
            RETURNING id, name, subject, body_html, created_at
            "#,
        )
        .bind(template.name)
        .bind(template.subject)
        .bind(template.body_html)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(template)
    }

    pub async fn get_template_by_id(&self, id: i64) -> Result<Option<EmailTemplate>> {
        let template = sqlx::query_as::<_, EmailTemplate>(
            "SELECT id, name, subject, body_html, created_at FROM email_templates WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(template)
    }

    pub async fn get_template_by_name(&self, name: &str) -> Result<Option<EmailTemplate>> {
        let template = sqlx::query_as::<_, EmailTemplate>(
            "SELECT id, name, subject, body_html, created_at FROM email_templates WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(template)
    }

    pub async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        let templates = sqlx::query_as::<_, EmailTemplate>(
            "SELECT id, name, subject, body_html, created_at FROM email_templates ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_pool;

    fn payload(name: &str) -> EmailTemplatePayload {
        EmailTemplatePayload {
            name: name.to_string(),
            subject: "Welcome {{ name }}".to_string(),
            body_html: "<p>Hello {{ name }}</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_get_update() {
        let pool = test_pool().await;
        let repo = EmailTemplateRepository::new(&pool);

        let created = repo.create_template(payload("welcome")).await.unwrap();
        let fetched = repo.get_template_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "welcome");
        assert_eq!(
            repo.get_template_by_name("welcome").await.unwrap().unwrap().id,
            created.id
        );

        let updated = repo
            .update_template(created.id, payload("welcome-v2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "welcome-v2");
        assert_eq!(updated.created_at, created.created_at);

        assert!(repo.update_template(9999, payload("x")).await.unwrap().is_none());
        assert!(repo.get_template_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_templates_in_creation_order() {
        let pool = test_pool().await;
        let repo = EmailTemplateRepository::new(&pool);

        repo.create_template(payload("a")).await.unwrap();
        repo.create_template(payload("b")).await.unwrap();

        let names: Vec<_> = repo
            .list_templates()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
