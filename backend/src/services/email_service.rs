//! Transactional email sending.
//!
//! Wraps an [`EmailSender`] and turns every delivery attempt into an
//! `EmailSendResponse`; delivery failures are reported in the response, never
//! as errors. Each attempt can be appended to the send-log through an
//! [`EmailLogRecorder`].

use crate::database::models::{EmailTemplate, NewEmailLog};
use crate::errors::{ServiceError, ServiceResult};
use crate::services::email_sender::{Delivery, EmailSender, OutgoingEmail};
use crate::services::template_renderer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Destination for send-log entries.
#[async_trait]
pub trait EmailLogRecorder: Send + Sync {
    async fn record(&self, log: NewEmailLog) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Success,
    Error,
}

/// Outcome of a send request, returned to the API caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSendResponse {
    pub status: SendStatus,
    pub message: String,
}

pub struct EmailService {
    sender: Arc<dyn EmailSender>,
}

impl EmailService {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// Sends one HTML email and records the attempt when a recorder is given.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        recorder: Option<&dyn EmailLogRecorder>,
    ) -> EmailSendResponse {
        let email = OutgoingEmail {
            to: to_email.to_string(),
            subject: subject.to_string(),
            html_body: html_content.to_string(),
        };

        let (response, log_status) = match self.sender.deliver(&email).await {
            Ok(delivery) => {
                info!("Email to {} {}", to_email, delivery.log_status());
                let message = match delivery {
                    Delivery::Previewed => format!(
                        "✅ Email logged (dev mode) - check backend terminal for preview. To: {to_email}"
                    ),
                    Delivery::Transmitted => {
                        format!("Email sent successfully to {to_email}")
                    }
                };
                (
                    EmailSendResponse {
                        status: SendStatus::Success,
                        message,
                    },
                    delivery.log_status().to_string(),
                )
            }
            Err(e) => {
                warn!("Failed to send email to {}: {}", to_email, e);
                (
                    EmailSendResponse {
                        status: SendStatus::Error,
                        message: format!("Failed to send email: {e}"),
                    },
                    format!("failed: {e}"),
                )
            }
        };

        if let Some(recorder) = recorder {
            let log = NewEmailLog {
                to_email: email.to,
                subject: email.subject,
                body: email.html_body,
                status: log_status,
            };
            if let Err(e) = recorder.record(log).await {
                error!("Failed to log email: {:#}", e);
            }
        }

        response
    }

    /// Renders `template` with `variables` and sends the result.
    ///
    /// # Errors
    /// Returns `ServiceError::Template` when the template is malformed. Delivery
    /// failures are not errors; they are reported in the response.
    pub async fn send_template_email(
        &self,
        to_email: &str,
        template: &EmailTemplate,
        variables: &HashMap<String, Value>,
        recorder: Option<&dyn EmailLogRecorder>,
    ) -> ServiceResult<EmailSendResponse> {
        let rendered_html = template_renderer::render(&template.body_html, variables)
            .map_err(|e| ServiceError::template(format!("body of '{}': {e}", template.name)))?;
        let rendered_subject = template_renderer::render(&template.subject, variables)
            .map_err(|e| ServiceError::template(format!("subject of '{}': {e}", template.name)))?;

        Ok(self
            .send_email(to_email, &rendered_subject, &rendered_html, recorder)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::email_sender::{ConsoleEmailSender, EmailError};
    use crate::test_utils::test_config;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRecorder {
        logs: Mutex<Vec<NewEmailLog>>,
    }

    #[async_trait]
    impl EmailLogRecorder for MemoryRecorder {
        async fn record(&self, log: NewEmailLog) -> anyhow::Result<()> {
            self.logs.lock().unwrap().push(log);
            Ok(())
        }
    }

    struct BrokenRecorder;

    #[async_trait]
    impl EmailLogRecorder for BrokenRecorder {
        async fn record(&self, _log: NewEmailLog) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("database is locked"))
        }
    }

    struct FailingSender;

    #[async_trait]
    impl EmailSender for FailingSender {
        async fn deliver(&self, _email: &OutgoingEmail) -> Result<Delivery, EmailError> {
            Err(EmailError::Transport("connection refused".to_string()))
        }
    }

    struct SmtpLikeSender;

    #[async_trait]
    impl EmailSender for SmtpLikeSender {
        async fn deliver(&self, _email: &OutgoingEmail) -> Result<Delivery, EmailError> {
            Ok(Delivery::Transmitted)
        }
    }

    fn console_service() -> EmailService {
        EmailService::new(Arc::new(ConsoleEmailSender::new(&test_config().email)))
    }

    fn template(subject: &str, body: &str) -> EmailTemplate {
        EmailTemplate {
            id: 1,
            name: "welcome".to_string(),
            subject: subject.to_string(),
            body_html: body.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dev_mode_always_succeeds_and_logs() {
        let service = console_service();
        let recorder = MemoryRecorder::default();

        let response = service
            .send_email("not-an-email", "Hi", "<p>Hi</p>", Some(&recorder))
            .await;

        assert_eq!(response.status, SendStatus::Success);
        assert_eq!(
            response.message,
            "✅ Email logged (dev mode) - check backend terminal for preview. To: not-an-email"
        );

        let logs = recorder.logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, "sent (dev mode)");
        assert_eq!(logs[0].to_email, "not-an-email");
    }

    #[tokio::test]
    async fn test_transmitted_message_is_logged_as_sent() {
        let service = EmailService::new(Arc::new(SmtpLikeSender));
        let recorder = MemoryRecorder::default();

        let response = service
            .send_email("ada@example.com", "Hi", "<p>Hi</p>", Some(&recorder))
            .await;

        assert_eq!(response.status, SendStatus::Success);
        assert_eq!(response.message, "Email sent successfully to ada@example.com");
        assert_eq!(recorder.logs.lock().unwrap()[0].status, "sent");
    }

    #[tokio::test]
    async fn test_delivery_failure_becomes_error_result() {
        let service = EmailService::new(Arc::new(FailingSender));
        let recorder = MemoryRecorder::default();

        let response = service
            .send_email("ada@example.com", "Hi", "<p>Hi</p>", Some(&recorder))
            .await;

        assert_eq!(response.status, SendStatus::Error);
        assert_eq!(response.message, "Failed to send email: connection refused");
        assert_eq!(
            recorder.logs.lock().unwrap()[0].status,
            "failed: connection refused"
        );
    }

    #[tokio::test]
    async fn test_log_failure_does_not_change_result() {
        let response = console_service()
            .send_email("ada@example.com", "Hi", "<p>Hi</p>", Some(&BrokenRecorder))
            .await;
        assert_eq!(response.status, SendStatus::Success);

        let response = EmailService::new(Arc::new(FailingSender))
            .send_email("ada@example.com", "Hi", "<p>Hi</p>", Some(&BrokenRecorder))
            .await;
        assert_eq!(response.status, SendStatus::Error);
    }

    #[tokio::test]
    async fn test_send_without_recorder() {
        let response = console_service()
            .send_email("ada@example.com", "Hi", "<p>Hi</p>", None)
            .await;
        assert_eq!(response.status, SendStatus::Success);
    }

    #[tokio::test]
    async fn test_send_template_email_renders_subject_and_body() {
        let recorder = MemoryRecorder::default();
        let variables: HashMap<String, Value> =
            serde_json::from_value(json!({"name": "Ada"})).unwrap();

        let response = console_service()
            .send_template_email(
                "ada@example.com",
                &template("Welcome {{ name }}", "<p>Hello {{ name }}, {{ missing }}!</p>"),
                &variables,
                Some(&recorder),
            )
            .await
            .unwrap();

        assert_eq!(response.status, SendStatus::Success);
        let logs = recorder.logs.lock().unwrap();
        assert_eq!(logs[0].subject, "Welcome Ada");
        assert_eq!(logs[0].body, "<p>Hello Ada, !</p>");
    }

    #[tokio::test]
    async fn test_malformed_template_is_an_error_and_not_logged() {
        let recorder = MemoryRecorder::default();

        let result = console_service()
            .send_template_email(
                "ada@example.com",
                &template("Welcome", "<p>Hello {{ name</p>"),
                &HashMap::new(),
                Some(&recorder),
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Template { .. })));
        assert!(recorder.logs.lock().unwrap().is_empty());
    }
}
