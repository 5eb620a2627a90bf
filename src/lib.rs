//! Logmail - a structured log handler that emails qualifying records
//!
//! Every record is rendered (text or JSON) and written to an output
//! destination; records at or above a configurable email level are also
//! dispatched as plaintext email notifications.
//!
//! # Delivery strategies
//!
//! - **Synchronous** ([`EmailHandler::new`]): the log call blocks on the
//!   SMTP round trip; transport errors return to the caller.
//! - **Queued** ([`EmailHandler::queued`]): tasks go onto a bounded queue
//!   drained by one background worker; a full queue blocks the log call
//!   rather than dropping, and [`StopHandle::stop`] drains before returning.
//! - **Custom** ([`EmailHandler::with_deliver`]): a user-supplied
//!   [`Deliver`] implementation takes over dispatch entirely.
//!
//! This is not a durable delivery system: there is no persistence, no retry
//! and at most one delivery attempt per record.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use logmail::{EmailHandler, EmailOptions, Level, Record, RenderOptions, SmtpConfig};
//!
//! #[tokio::main]
//! async fn main() -> logmail::Result<()> {
//!     let (handler, stop) = EmailHandler::queued(
//!         std::io::stderr(),
//!         RenderOptions::default(),
//!         EmailOptions::new("alerts@example.com", Level::Error)
//!             .to("oncall@example.com")
//!             .smtp(SmtpConfig::new("smtp.example.com").credentials("user", "pass")),
//!     )?;
//!
//!     handler
//!         .handle(&Record::new(Level::Error, "db down").attr("db", "primary"))
//!         .await?;
//!
//!     stop.stop().await;
//!     Ok(())
//! }
//! ```

pub mod email;
mod error;
mod handler;
mod record;
pub mod render;
pub mod traits;

// Re-exports for public API
pub use email::{ConsoleMailer, SmtpConfig, SmtpMailer};
pub use error::{LogmailError, Result};
pub use handler::{BodyFn, EmailHandler, EmailOptions, StopHandle, SubjectFn};
pub use record::{Attr, Level, Record};
pub use render::{JsonRenderer, TextRenderer};
pub use traits::deliver::Deliver;
pub use traits::mailer::{Email, Mailer};
pub use traits::render::{Render, RenderOptions};
