//! Console mailer for development
//!
//! Prints notifications to stdout instead of sending them, useful for local
//! development. Log notifications may contain sensitive field values, so
//! prefer a real transport anywhere stdout is captured.

use crate::error::Result;
use crate::traits::mailer::{Email, Mailer};
use async_trait::async_trait;

/// A mailer that prints emails to stdout instead of sending them
///
/// # Example
///
/// ```rust,ignore
/// use logmail::{ConsoleMailer, Email, Mailer};
///
/// let mailer = ConsoleMailer::new();
/// let email = Email::new("alerts@example.com", "ERROR")
///     .to("oncall@example.com")
///     .body("db down");
///
/// mailer.send(&email).await?; // Prints to stdout
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleMailer {
    /// Prefix for each printed line
    prefix: String,
}

impl ConsoleMailer {
    /// Create a new console mailer
    pub fn new() -> Self {
        Self {
            prefix: "[EMAIL]".to_string(),
        }
    }

    /// Create a console mailer with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for ConsoleMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        email.validate()?;

        println!("{} ════════════════════════════════════════", self.prefix);
        println!("{} From:    {}", self.prefix, email.from);
        println!("{} To:      {}", self.prefix, email.to.join(", "));
        println!("{} Subject: {}", self.prefix, email.subject);
        println!("{} ────────────────────────────────────────", self.prefix);
        for line in email.body.lines() {
            println!("{} {}", self.prefix, line);
        }
        println!("{} ════════════════════════════════════════", self.prefix);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_mailer_sends_without_error() {
        let mailer = ConsoleMailer::new();
        let email = Email::new("from@test.com", "Test Subject")
            .to("to@test.com")
            .body("Test body");

        let result = mailer.send(&email).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_console_mailer_validates_email() {
        let mailer = ConsoleMailer::new();
        // No recipients - should fail validation
        let email = Email::new("from@test.com", "Test Subject").body("body");

        let result = mailer.send(&email).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_console_mailer_custom_prefix_sends() {
        let mailer = ConsoleMailer::with_prefix("[CUSTOM]");
        let email = Email::new("from@test.com", "Test Subject")
            .to("to@test.com")
            .body("Test body");

        assert!(mailer.send(&email).await.is_ok());
    }
}
