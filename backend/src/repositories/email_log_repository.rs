//! Database repository for the email send-log.
//!
//! The log is append-only: rows are inserted once per delivery attempt and
//! listed newest first.

use crate::{
    api::common::PaginationFilter,
    database::models::{EmailLog, NewEmailLog},
    services::email_service::EmailLogRecorder,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct EmailLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmailLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends one log row inside its own transaction.
    ///
    /// The transaction is rolled back when it is dropped without commit, so a
    /// failed insert leaves nothing behind.
    pub async fn create_log(&self, log: NewEmailLog) -> Result<EmailLog> {
        let mut tx = self.pool.begin().await?;

        let log = sqlx::query_as::<_, EmailLog>(
            r#"
            INSERT INTO email_logs (to_email, subject, body, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, to_email, subject, body, status, created_at
            "#,
        )
        .bind(log.to_email)
        .bind(log.subject)
        .bind(log.body)
        .bind(log.status)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(log)
    }

    /// Lists log entries, newest first.
    pub async fn list_logs(&self, pagination: &PaginationFilter) -> Result<Vec<EmailLog>> {
        let logs = sqlx::query_as::<_, EmailLog>(
            r#"
            SELECT id, to_email, subject, body, status, created_at
            FROM email_logs
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }

    pub async fn count_logs(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM email_logs")
            .fetch_one(self.pool)
            .await?;

        Ok(count as u64)
    }
}

#[async_trait]
impl<'a> EmailLogRecorder for EmailLogRepository<'a> {
    async fn record(&self, log: NewEmailLog) -> Result<()> {
        self.create_log(log).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_pool;

    fn entry(status: &str) -> NewEmailLog {
        NewEmailLog {
            to_email: "ada@example.com".to_string(),
            subject: "Hi".to_string(),
            body: "<p>Hi</p>".to_string(),
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn test_logs_are_listed_newest_first() {
        let pool = test_pool().await;
        let repo = EmailLogRepository::new(&pool);

        repo.record(entry("failed: first")).await.unwrap();
        repo.record(entry("failed: second")).await.unwrap();
        repo.record(entry("sent")).await.unwrap();

        let statuses: Vec<_> = repo
            .list_logs(&PaginationFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.status)
            .collect();
        assert_eq!(statuses, vec!["sent", "failed: second", "failed: first"]);
    }

    #[tokio::test]
    async fn test_list_logs_skip_and_limit() {
        let pool = test_pool().await;
        let repo = EmailLogRepository::new(&pool);

        for i in 0..4 {
            repo.record(entry(&format!("sent {i}"))).await.unwrap();
        }

        let page = repo
            .list_logs(&PaginationFilter {
                skip: Some(1),
                limit: Some(2),
            })
            .await
            .unwrap();
        let statuses: Vec<_> = page.into_iter().map(|l| l.status).collect();
        assert_eq!(statuses, vec!["sent 2", "sent 1"]);
        assert_eq!(repo.count_logs().await.unwrap(), 4);
    }
}
