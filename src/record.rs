//! Log records and severity levels
//!
//! A [`Record`] is one structured log event: a timestamp, a severity level,
//! a message and zero or more key/value attributes. Records are owned by the
//! caller; the handler only reads them.

use crate::error::LogmailError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Log severity level, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl Level {
    /// Upper-case level name, as rendered in log output and email subjects
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(LogmailError::config(format!("unknown log level: {}", s))),
        }
    }
}

/// A single structured key/value pair attached to a record
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: Value,
}

impl Attr {
    /// Create an attribute from a key and any JSON-convertible value
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One structured log event
#[derive(Debug, Clone)]
pub struct Record {
    /// Time the record was created
    pub time: DateTime<Utc>,
    /// Severity level
    pub level: Level,
    /// Log message
    pub message: String,
    /// Structured attributes
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Create a record at the current time with no attributes
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    /// Attach an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "ERROR");
        assert_eq!(Level::Info.to_string(), "INFO");
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new(Level::Info, "user signed in")
            .attr("user_id", 42)
            .attr("plan", "pro");

        assert_eq!(record.level, Level::Info);
        assert_eq!(record.message, "user signed in");
        assert_eq!(record.attrs.len(), 2);
        assert_eq!(record.attrs[0].key, "user_id");
        assert_eq!(record.attrs[1].value, Value::from("pro"));
    }
}
