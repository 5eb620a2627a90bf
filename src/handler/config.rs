//! Handler configuration and subject/body derivation

use crate::email::SmtpConfig;
use crate::error::{LogmailError, Result};
use crate::record::{Level, Record};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// User-defined email subject derivation: receives the record and its
/// rendered text, returns the subject line
pub type SubjectFn = Arc<dyn Fn(&Record, &str) -> String + Send + Sync>;

/// User-defined email body derivation: receives the record and its rendered
/// text, returns the body (or an error, which propagates to `handle`)
pub type BodyFn = Arc<dyn Fn(&Record, &str) -> Result<String> + Send + Sync>;

/// Options for email dispatch, captured once at handler construction
///
/// # Example
///
/// ```rust,ignore
/// use logmail::{EmailOptions, Level, SmtpConfig};
///
/// let opts = EmailOptions::new("alerts@example.com", Level::Error)
///     .to("oncall@example.com")
///     .json(true)
///     .smtp(SmtpConfig::new("smtp.example.com"));
/// ```
#[must_use = "options do nothing until passed to an EmailHandler constructor"]
pub struct EmailOptions {
    /// Sender address
    pub from_addr: String,
    /// Recipient addresses
    pub to_addrs: Vec<String>,
    /// Render records as JSON instead of text. Also makes the default email
    /// body a pretty-printed re-serialization of the rendered JSON.
    pub json: bool,
    /// Minimum level at which records are emailed. Independent of the base
    /// render level: a record may be written to the output stream without
    /// being emailed, never the reverse.
    pub level: Level,
    /// Custom subject derivation. Default: the record's level name.
    pub subject_fn: Option<SubjectFn>,
    /// Custom body derivation. Default: the rendered text, pretty-printed
    /// when rendering as JSON.
    pub body_fn: Option<BodyFn>,
    /// SMTP connection parameters. Required unless a custom mailer or
    /// delivery function is supplied.
    pub smtp: Option<SmtpConfig>,
    /// Capacity of the bounded queue used by the queued variant (default: 1)
    pub queue_capacity: usize,
}

impl EmailOptions {
    /// Create options with a sender address and email level threshold
    pub fn new(from_addr: impl Into<String>, level: Level) -> Self {
        Self {
            from_addr: from_addr.into(),
            to_addrs: Vec::new(),
            json: false,
            level,
            subject_fn: None,
            body_fn: None,
            smtp: None,
            queue_capacity: 1,
        }
    }

    /// Add a recipient address
    pub fn to(mut self, addr: impl Into<String>) -> Self {
        self.to_addrs.push(addr.into());
        self
    }

    /// Add multiple recipient addresses
    pub fn to_many(mut self, addrs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to_addrs.extend(addrs.into_iter().map(|a| a.into()));
        self
    }

    /// Render records as JSON instead of text
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Set a custom subject derivation function
    pub fn subject_fn(
        mut self,
        f: impl Fn(&Record, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.subject_fn = Some(Arc::new(f));
        self
    }

    /// Set a custom body derivation function
    pub fn body_fn(
        mut self,
        f: impl Fn(&Record, &str) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.body_fn = Some(Arc::new(f));
        self
    }

    /// Set SMTP connection parameters
    pub fn smtp(mut self, config: SmtpConfig) -> Self {
        self.smtp = Some(config);
        self
    }

    /// Set the bounded queue capacity for the queued variant (default: 1)
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub(crate) fn into_config(self) -> EmailConfig {
        EmailConfig {
            from_addr: self.from_addr,
            to_addrs: self.to_addrs,
            json: self.json,
            level: self.level,
            subject_fn: self.subject_fn,
            body_fn: self.body_fn,
        }
    }
}

impl fmt::Debug for EmailOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailOptions")
            .field("from_addr", &self.from_addr)
            .field("to_addrs", &self.to_addrs)
            .field("json", &self.json)
            .field("level", &self.level)
            .field("subject_fn", &self.subject_fn.is_some())
            .field("body_fn", &self.body_fn.is_some())
            .field("smtp", &self.smtp)
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

/// Email dispatch state kept for the handler's lifetime
pub(crate) struct EmailConfig {
    pub(crate) from_addr: String,
    pub(crate) to_addrs: Vec<String>,
    pub(crate) json: bool,
    pub(crate) level: Level,
    pub(crate) subject_fn: Option<SubjectFn>,
    pub(crate) body_fn: Option<BodyFn>,
}

impl EmailConfig {
    /// Config for the custom-delivery variant, which derives nothing itself
    pub(crate) fn custom(json: bool) -> Self {
        Self {
            from_addr: String::new(),
            to_addrs: Vec::new(),
            json,
            level: Level::Debug,
            subject_fn: None,
            body_fn: None,
        }
    }
}

/// Re-serialize a rendered JSON line with 4-space indentation
///
/// Malformed input is a hard error; the default JSON body derivation must
/// never silently fall back to raw text.
pub(crate) fn pretty_json(raw: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| LogmailError::render(format!("pretty-printed JSON is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts = EmailOptions::new("alerts@test.com", Level::Error);
        assert_eq!(opts.from_addr, "alerts@test.com");
        assert_eq!(opts.level, Level::Error);
        assert!(!opts.json);
        assert_eq!(opts.queue_capacity, 1);
        assert!(opts.subject_fn.is_none());
        assert!(opts.body_fn.is_none());
        assert!(opts.smtp.is_none());
    }

    #[test]
    fn test_options_builder() {
        let opts = EmailOptions::new("alerts@test.com", Level::Warn)
            .to("a@test.com")
            .to_many(["b@test.com", "c@test.com"])
            .json(true)
            .queue_capacity(16)
            .subject_fn(|record: &Record, _rendered: &str| format!("[alert] {}", record.level));

        assert_eq!(opts.to_addrs, vec!["a@test.com", "b@test.com", "c@test.com"]);
        assert!(opts.json);
        assert_eq!(opts.queue_capacity, 16);
        assert!(opts.subject_fn.is_some());
    }

    #[test]
    fn test_pretty_json_uses_four_space_indent() {
        let pretty = pretty_json("{\"msg\":\"db down\"}\n").unwrap();
        assert_eq!(pretty, "{\n    \"msg\": \"db down\"\n}");
    }

    #[test]
    fn test_pretty_json_rejects_malformed_input() {
        let result = pretty_json("time=... level=INFO msg=hello");
        assert!(matches!(result, Err(LogmailError::Json(_))));
    }
}
