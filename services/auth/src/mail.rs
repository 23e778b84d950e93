//! Outgoing mail for confirmation codes
//!
//! The [`Mailer`] trait is the only thing the HTTP layer depends on. Two
//! backends are provided: SMTP through lettre, and a log backend that writes
//! the message to the tracing output for local development.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::{env, sync::Arc};
use thiserror::Error;
use tracing::info;

/// Mail errors
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail configuration error: {0}")]
    Configuration(String),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

pub type MailResult<T> = Result<T, MailError>;

/// Something that can deliver a plain-text message
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()>;
}

/// Which delivery backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    Smtp,
    Log,
}

/// Mail configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub use_tls: bool,
    pub from_address: String,
}

impl MailConfig {
    /// Load mail configuration from environment variables
    ///
    /// # Environment Variables
    /// - `MAIL_BACKEND`: `smtp` or `log` (default: `log`)
    /// - `SMTP_HOST` (default: `localhost`), `SMTP_PORT` (default: 587)
    /// - `SMTP_USERNAME`, `SMTP_PASSWORD` (default: empty, no authentication)
    /// - `SMTP_USE_TLS` (default: true)
    /// - `MAIL_FROM` (default: `noreply@yamdb.local`)
    pub fn from_env() -> MailResult<Self> {
        let backend = match env::var("MAIL_BACKEND")
            .unwrap_or_else(|_| "log".to_string())
            .to_lowercase()
            .as_str()
        {
            "smtp" => MailBackend::Smtp,
            "log" => MailBackend::Log,
            other => {
                return Err(MailError::Configuration(format!(
                    "Unknown MAIL_BACKEND: {}",
                    other
                )));
            }
        };

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| MailError::Configuration("Invalid SMTP_PORT".to_string()))?;

        let use_tls = env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|_| MailError::Configuration("Invalid SMTP_USE_TLS".to_string()))?;

        Ok(MailConfig {
            backend,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port,
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            use_tls,
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@yamdb.local".to_string()),
        })
    }
}

/// Build the configured mailer
pub fn build_mailer(config: &MailConfig) -> MailResult<Arc<dyn Mailer>> {
    match config.backend {
        MailBackend::Smtp => Ok(Arc::new(SmtpMailer::new(config)?)),
        MailBackend::Log => Ok(Arc::new(LogMailer::new(&config.from_address)?)),
    }
}

/// SMTP delivery through lettre's async transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> MailResult<Self> {
        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let builder = builder.port(config.smtp_port);
        let builder = if config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
        };

        info!(
            "SMTP mailer configured for {}:{}",
            config.smtp_host, config.smtp_port
        );

        Ok(SmtpMailer {
            transport: builder.build(),
            from: config.from_address.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
        let message = plain_message(&self.from, to, subject, body)?;
        self.transport.send(message).await?;
        info!("Mail sent to {}", to);
        Ok(())
    }
}

/// Writes messages to the log instead of delivering them
pub struct LogMailer {
    from: Mailbox,
}

impl LogMailer {
    pub fn new(from_address: &str) -> MailResult<Self> {
        Ok(LogMailer {
            from: from_address.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
        // Build the message anyway so bad addresses fail the same way as SMTP.
        plain_message(&self.from, to, subject, body)?;
        info!(to, subject, body, "Mail not delivered (log backend)");
        Ok(())
    }
}

fn plain_message(from: &Mailbox, to: &str, subject: &str, body: &str) -> MailResult<Message> {
    let message = Message::builder()
        .from(from.clone())
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            for name in [
                "MAIL_BACKEND",
                "SMTP_HOST",
                "SMTP_PORT",
                "SMTP_USERNAME",
                "SMTP_PASSWORD",
                "SMTP_USE_TLS",
                "MAIL_FROM",
            ] {
                env::remove_var(name);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_to_log_backend() {
        clear_env();
        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.backend, MailBackend::Log);
        assert_eq!(config.smtp_port, 587);
        assert!(config.use_tls);
        assert_eq!(config.from_address, "noreply@yamdb.local");
    }

    #[test]
    #[serial]
    fn reads_smtp_settings() {
        clear_env();
        unsafe {
            env::set_var("MAIL_BACKEND", "SMTP");
            env::set_var("SMTP_HOST", "mail.example.com");
            env::set_var("SMTP_PORT", "2525");
            env::set_var("SMTP_USE_TLS", "false");
        }

        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.backend, MailBackend::Smtp);
        assert_eq!(config.smtp_host, "mail.example.com");
        assert_eq!(config.smtp_port, 2525);
        assert!(!config.use_tls);

        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_unknown_backend() {
        clear_env();
        unsafe {
            env::set_var("MAIL_BACKEND", "pigeon");
        }
        assert!(matches!(
            MailConfig::from_env(),
            Err(MailError::Configuration(_))
        ));
        clear_env();
    }

    #[tokio::test]
    async fn log_mailer_accepts_valid_recipients() {
        let mailer = LogMailer::new("noreply@yamdb.local").unwrap();
        mailer
            .send("critic@example.com", "YaMDb registration", "Your code: 123456")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn log_mailer_rejects_invalid_recipients() {
        let mailer = LogMailer::new("noreply@yamdb.local").unwrap();
        let result = mailer.send("not an address", "subject", "body").await;
        assert!(matches!(result, Err(MailError::Address(_))));
    }
}
