//! Render trait for formatting records
//!
//! This trait abstracts the rendering backend that turns a [`Record`] into a
//! formatted line. The crate ships text and JSON renderers, but any backend
//! implementing this trait can be plugged into the handler.

use crate::error::Result;
use crate::record::{Attr, Level, Record};

/// Options shared by all renderers
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Minimum level a record must have to be rendered at all. This is the
    /// base filter consulted by `enabled`, independent of the email threshold.
    pub level: Level,
}

impl RenderOptions {
    /// Create render options with the given minimum level
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Set the minimum level
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { level: Level::Info }
    }
}

/// Renderer trait for formatting log records
///
/// Implementations must be immutable: `with_attrs` and `with_group` return a
/// new renderer rather than mutating in place, so a renderer can be shared
/// across threads and across derived handlers.
pub trait Render: Send + Sync {
    /// Whether a record at this level passes the base render filter
    fn enabled(&self, level: Level) -> bool;

    /// Format one record into a single line, including the trailing newline
    fn render(&self, record: &Record) -> Result<String>;

    /// Return a renderer with additional attributes bound to every record
    fn with_attrs(&self, attrs: Vec<Attr>) -> Box<dyn Render>;

    /// Return a renderer that nests subsequent attribute keys under a group
    fn with_group(&self, name: &str) -> Box<dyn Render>;
}
