//! SMTP mailer using lettre
//!
//! Sends log notifications as plaintext emails via an SMTP server.

use crate::error::{LogmailError, Result};
use crate::traits::mailer::{Email, Mailer};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

/// SMTP connection configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,
    /// SMTP server port (default: 587 for STARTTLS)
    pub port: u16,
    /// Username for authentication
    pub username: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Use STARTTLS (default: true)
    pub starttls: bool,
}

impl SmtpConfig {
    /// Create a new SMTP configuration with the server hostname
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 587,
            username: None,
            password: None,
            starttls: true,
        }
    }

    /// Set the port (default: 587)
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set authentication credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Disable STARTTLS (use plain connection or implicit TLS)
    pub fn no_starttls(mut self) -> Self {
        self.starttls = false;
        self
    }

    /// Create config from environment variables
    ///
    /// Reads from:
    /// - `SMTP_HOST` (required)
    /// - `SMTP_PORT` (optional, default: 587)
    /// - `SMTP_USERNAME` (optional)
    /// - `SMTP_PASSWORD` (optional)
    /// - `SMTP_STARTTLS` (optional, default: true)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| LogmailError::config("SMTP_HOST environment variable not set"))?;

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);

        let username = std::env::var("SMTP_USERNAME").ok();
        let password = std::env::var("SMTP_PASSWORD").ok();
        let starttls = std::env::var("SMTP_STARTTLS")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            username,
            password,
            starttls,
        })
    }
}

/// SMTP mailer using lettre
///
/// One instance is shared by the synchronous dispatch path and the queued
/// worker; lettre's async transport tolerates concurrent sends.
///
/// # Example
///
/// ```rust,ignore
/// use logmail::{Email, Mailer, SmtpConfig, SmtpMailer};
///
/// let config = SmtpConfig::new("smtp.example.com")
///     .port(587)
///     .credentials("alerts@example.com", "app-password");
///
/// let mailer = SmtpMailer::new(config)?;
///
/// let email = Email::new("alerts@example.com", "ERROR")
///     .to("oncall@example.com")
///     .body("db down");
///
/// mailer.send(&email).await?;
/// ```
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer with the given configuration
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host).map_err(|e| {
                LogmailError::config(format!("Failed to create SMTP transport: {}", e))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(|e| {
                LogmailError::config(format!("Failed to create SMTP transport: {}", e))
            })?
        };

        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            let credentials = Credentials::new(username.clone(), password.clone());
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            transport: Arc::new(builder.build()),
            config,
        })
    }

    /// Create a new SMTP mailer from environment variables
    pub fn from_env() -> Result<Self> {
        let config = SmtpConfig::from_env()?;
        Self::new(config)
    }

    fn build_message(&self, email: &Email) -> Result<Message> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|e| LogmailError::config(format!("Invalid 'from' address: {}", e)))?;

        let mut builder = Message::builder().from(from).subject(&email.subject);

        for to in &email.to {
            let mailbox: Mailbox = to.parse().map_err(|e| {
                LogmailError::config(format!("Invalid 'to' address '{}': {}", to, e))
            })?;
            builder = builder.to(mailbox);
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| LogmailError::transport(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        email.validate()?;

        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| LogmailError::transport(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

// Implement Debug manually since AsyncSmtpTransport doesn't impl Debug
impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_config_builder() {
        let config = SmtpConfig::new("smtp.test.com")
            .port(465)
            .credentials("user", "pass")
            .no_starttls();

        assert_eq!(config.host, "smtp.test.com");
        assert_eq!(config.port, 465);
        assert_eq!(config.username, Some("user".to_string()));
        assert_eq!(config.password, Some("pass".to_string()));
        assert!(!config.starttls);
    }

    #[test]
    fn test_smtp_config_defaults() {
        let config = SmtpConfig::new("smtp.test.com");

        assert_eq!(config.host, "smtp.test.com");
        assert_eq!(config.port, 587);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.starttls);
    }

    // Env vars are process-global, so every from_env behavior is asserted in
    // this one test rather than racing across parallel test threads.
    #[test]
    fn test_smtp_config_from_env() {
        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
        std::env::remove_var("SMTP_USERNAME");
        std::env::remove_var("SMTP_PASSWORD");
        std::env::remove_var("SMTP_STARTTLS");

        // Missing SMTP_HOST is a configuration error
        let result = SmtpConfig::from_env();
        assert!(matches!(result, Err(LogmailError::Config(_))));

        // Host alone: everything else takes its default
        std::env::set_var("SMTP_HOST", "smtp.test.com");
        let config = SmtpConfig::from_env().unwrap();
        assert_eq!(config.host, "smtp.test.com");
        assert_eq!(config.port, 587);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.starttls);

        std::env::set_var("SMTP_PORT", "2525");
        std::env::set_var("SMTP_USERNAME", "user");
        std::env::set_var("SMTP_PASSWORD", "pass");
        std::env::set_var("SMTP_STARTTLS", "false");
        let config = SmtpConfig::from_env().unwrap();
        assert_eq!(config.port, 2525);
        assert_eq!(config.username, Some("user".to_string()));
        assert_eq!(config.password, Some("pass".to_string()));
        assert!(!config.starttls);

        // "0" also disables STARTTLS; an unparseable port falls back to 587
        std::env::set_var("SMTP_STARTTLS", "0");
        std::env::set_var("SMTP_PORT", "not-a-port");
        let config = SmtpConfig::from_env().unwrap();
        assert!(!config.starttls);
        assert_eq!(config.port, 587);

        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
        std::env::remove_var("SMTP_USERNAME");
        std::env::remove_var("SMTP_PASSWORD");
        std::env::remove_var("SMTP_STARTTLS");
    }

    #[test]
    fn test_invalid_from_address() {
        let mailer = SmtpMailer::new(SmtpConfig::new("smtp.test.com")).unwrap();
        let email = Email::new("not an address", "subject")
            .to("to@test.com")
            .body("body");

        let result = mailer.build_message(&email);
        assert!(result.is_err());
    }
}
