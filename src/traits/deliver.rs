//! Deliver trait for fully custom email dispatch
//!
//! A [`Deliver`] implementation replaces the default subject/body derivation
//! and transport entirely. It receives the raw record and its rendered text
//! and assumes full responsibility for deciding what, if anything, to send.

use crate::error::Result;
use crate::record::Record;
use async_trait::async_trait;

/// Custom delivery strategy for qualifying log records
///
/// Useful when a plain SMTP send is not sufficient, for example to template
/// the message, route by level, or hand off to a non-SMTP service.
///
/// Errors returned here propagate to the caller of `handle`.
#[async_trait]
pub trait Deliver: Send + Sync {
    /// Deliver a rendered record, or decide not to
    async fn deliver(&self, record: &Record, rendered: &str) -> Result<()>;
}
