//! Email delivery channels.
//!
//! `EmailSender` is implemented twice: `ConsoleEmailSender` previews messages
//! in the log without any network traffic (development mode), while
//! `SmtpEmailSender` transmits them through an authenticated STARTTLS relay.
//! Which one runs is decided once, at startup, by [`build_email_sender`].

use crate::config::EmailConfig;
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Number of body characters shown in a development-mode preview.
pub const PREVIEW_CHARS: usize = 200;

/// A fully rendered message addressed to a single recipient.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// How a message left the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Shown on the console only.
    Previewed,
    /// Accepted by the SMTP relay.
    Transmitted,
}

impl Delivery {
    /// Status string written to the send-log.
    pub fn log_status(&self) -> &'static str {
        match self {
            Delivery::Previewed => "sent (dev mode)",
            Delivery::Transmitted => "sent",
        }
    }
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, EmailError>;
}

/// Selects the sender for the configured mode.
pub fn build_email_sender(config: &EmailConfig) -> ServiceResult<Arc<dyn EmailSender>> {
    if config.development_mode {
        info!("Email development mode enabled, messages will only be previewed");
        Ok(Arc::new(ConsoleEmailSender::new(config)))
    } else {
        info!(
            "Email production mode, relaying through {}:{}",
            config.smtp_host, config.smtp_port
        );
        Ok(Arc::new(SmtpEmailSender::new(config)?))
    }
}

/// Truncated body shown in development mode.
pub fn body_preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

pub struct ConsoleEmailSender {
    from_name: String,
    from_email: String,
}

impl ConsoleEmailSender {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            from_name: config.from_name.clone(),
            from_email: config.from_email.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for ConsoleEmailSender {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, EmailError> {
        info!(
            from = %format!("{} <{}>", self.from_name, self.from_email),
            to = %email.to,
            subject = %email.subject,
            body_preview = %body_preview(&email.html_body),
            "DEVELOPMENT MODE - email preview, nothing was sent"
        );
        Ok(Delivery::Previewed)
    }
}

/// Transport seam so the SMTP path can run without a server.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Message) -> Result<(), String>;
}

#[async_trait]
impl Mailer for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, email: Message) -> Result<(), String> {
        AsyncTransport::send(self, email)
            .await
            .map(|_response| ())
            .map_err(|e| e.to_string())
    }
}

pub struct SmtpEmailSender {
    mailer: Box<dyn Mailer>,
    from_name: String,
    from_email: String,
}

impl SmtpEmailSender {
    /// Creates a sender relaying through the configured SMTP server.
    pub fn new(config: &EmailConfig) -> ServiceResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| ServiceError::internal_error(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self::with_mailer(Box::new(mailer), config))
    }

    pub fn with_mailer(mailer: Box<dyn Mailer>, config: &EmailConfig) -> Self {
        Self {
            mailer,
            from_name: config.from_name.clone(),
            from_email: config.from_email.clone(),
        }
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, EmailError> {
        let from_address = self
            .from_email
            .parse::<Address>()
            .map_err(|e| EmailError::InvalidAddress(format!("sender '{}': {e}", self.from_email)))?;
        let from_mailbox = Mailbox::new(Some(self.from_name.clone()), from_address);

        let to_mailbox = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidAddress(format!("recipient '{}': {e}", email.to)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(email.subject.as_str())
            .multipart(
                MultiPart::alternative().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email.html_body.clone()),
                ),
            )
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<Delivery, EmailError> {
        let message = self.build_message(email)?;

        self.mailer
            .send(message)
            .await
            .map_err(EmailError::Transport)?;

        Ok(Delivery::Transmitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_config;
    use std::sync::Mutex;

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            subject: "Welcome".to_string(),
            html_body: "<p>Hello Ada</p>".to_string(),
        }
    }

    #[derive(Default, Clone)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: Message) -> Result<(), String> {
            let raw = String::from_utf8_lossy(&email.formatted()).into_owned();
            self.sent.lock().unwrap().push(raw);
            Ok(())
        }
    }

    struct RejectingMailer;

    #[async_trait]
    impl Mailer for RejectingMailer {
        async fn send(&self, _email: Message) -> Result<(), String> {
            Err("permanent error (535): authentication failed".to_string())
        }
    }

    struct UnreachableMailer;

    #[async_trait]
    impl Mailer for UnreachableMailer {
        async fn send(&self, _email: Message) -> Result<(), String> {
            panic!("mailer must not be reached");
        }
    }

    #[test]
    fn test_body_preview_truncates_to_200_chars() {
        let short = "a".repeat(200);
        assert_eq!(body_preview(&short), short);

        let long = "é".repeat(250);
        let preview = body_preview(&long);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }

    #[tokio::test]
    async fn test_console_sender_accepts_any_recipient() {
        let sender = ConsoleEmailSender::new(&test_config().email);

        for to in ["ada@example.com", "not-an-email", ""] {
            let delivery = sender.deliver(&email(to)).await.unwrap();
            assert_eq!(delivery, Delivery::Previewed);
            assert_eq!(delivery.log_status(), "sent (dev mode)");
        }
    }

    #[tokio::test]
    async fn test_smtp_sender_builds_html_alternative_message() {
        let mailer = RecordingMailer::default();
        let sender = SmtpEmailSender::with_mailer(Box::new(mailer.clone()), &test_config().email);

        let delivery = sender.deliver(&email("ada@example.com")).await.unwrap();
        assert_eq!(delivery, Delivery::Transmitted);
        assert_eq!(delivery.log_status(), "sent");

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("To: ada@example.com"));
        assert!(sent[0].contains("Subject: Welcome"));
        assert!(sent[0].contains("multipart/alternative"));
        assert!(sent[0].contains("text/html"));
        assert!(sent[0].contains("<p>Hello Ada</p>"));
    }

    #[tokio::test]
    async fn test_smtp_sender_reports_transport_failure() {
        let sender = SmtpEmailSender::with_mailer(Box::new(RejectingMailer), &test_config().email);

        let err = sender.deliver(&email("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, EmailError::Transport(_)));
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_never_reaches_transport() {
        let sender =
            SmtpEmailSender::with_mailer(Box::new(UnreachableMailer), &test_config().email);

        let err = sender.deliver(&email("not-an-email")).await.unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_invalid_sender_address() {
        let mut config = test_config().email;
        config.from_email = String::new();
        let sender = SmtpEmailSender::with_mailer(Box::new(UnreachableMailer), &config);

        let err = sender.deliver(&email("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_build_email_sender_follows_mode() {
        let mut config = test_config().email;
        config.development_mode = true;
        let sender = build_email_sender(&config).unwrap();

        // Development mode previews even an undeliverable address
        let delivery = sender.deliver(&email("nobody")).await.unwrap();
        assert_eq!(delivery, Delivery::Previewed);
    }
}
