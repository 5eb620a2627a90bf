//! Mailer trait for sending plaintext notifications
//!
//! This trait abstracts the mail transport, allowing users to swap between
//! SMTP, third-party services, or console output for development.

use crate::error::{LogmailError, Result};
use async_trait::async_trait;

/// A plaintext email message to be sent
#[derive(Debug, Clone)]
pub struct Email {
    /// Sender email address (e.g., "alerts@example.com")
    pub from: String,
    /// Recipient email addresses
    pub to: Vec<String>,
    /// Email subject line
    pub subject: String,
    /// Plaintext body
    pub body: String,
}

impl Email {
    /// Create a new email with a sender and subject
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
            subject: subject.into(),
            body: String::new(),
        }
    }

    /// Add a recipient
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Add multiple recipients
    pub fn to_many(mut self, recipients: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to.extend(recipients.into_iter().map(|r| r.into()));
        self
    }

    /// Set the plaintext body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Validate the email has required fields
    pub fn validate(&self) -> Result<()> {
        if self.from.is_empty() {
            return Err(LogmailError::config("Email 'from' is required"));
        }
        if self.to.is_empty() {
            return Err(LogmailError::config("Email 'to' is required"));
        }
        Ok(())
    }
}

/// Mailer trait for sending emails
///
/// Implement this trait to create custom mail transports. Cancellation is
/// expressed the usual async way: dropping or timing out the `send` future
/// aborts an in-flight delivery.
///
/// # Example
///
/// ```rust,ignore
/// use logmail::{Email, Mailer, Result};
/// use async_trait::async_trait;
///
/// struct MyMailer;
///
/// #[async_trait]
/// impl Mailer for MyMailer {
///     async fn send(&self, email: &Email) -> Result<()> {
///         // Send via your preferred service
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an email
    ///
    /// Returns `Ok(())` if the email was sent successfully.
    async fn send(&self, email: &Email) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_builder() {
        let email = Email::new("alerts@test.com", "ERROR")
            .to("oncall@test.com")
            .to("team@test.com")
            .body("db down");

        assert_eq!(email.from, "alerts@test.com");
        assert_eq!(email.to, vec!["oncall@test.com", "team@test.com"]);
        assert_eq!(email.subject, "ERROR");
        assert_eq!(email.body, "db down");
    }

    #[test]
    fn test_email_to_many() {
        let email = Email::new("alerts@test.com", "WARN")
            .to_many(["a@test.com", "b@test.com"])
            .body("body");
        assert_eq!(email.to, vec!["a@test.com", "b@test.com"]);
    }

    #[test]
    fn test_email_validation_requires_from() {
        let email = Email::new("", "subject").to("to@test.com");
        let result = email.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("'from'"));
    }

    #[test]
    fn test_email_validation_requires_recipient() {
        let email = Email::new("from@test.com", "subject");
        let result = email.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("'to'"));
    }
}
