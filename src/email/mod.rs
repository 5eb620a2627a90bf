//! Mail transports
//!
//! Two [`Mailer`](crate::Mailer) backends are provided:
//! - [`ConsoleMailer`] - prints notifications to stdout (for development)
//! - [`SmtpMailer`] - sends notifications via SMTP using lettre

mod console;
mod smtp;

pub use console::ConsoleMailer;
pub use smtp::{SmtpConfig, SmtpMailer};

// Re-export Email from traits for convenience
pub use crate::traits::mailer::Email;
