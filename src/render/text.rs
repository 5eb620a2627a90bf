//! Logfmt-style text renderer
//!
//! Produces lines like:
//!
//! ```text
//! time=2026-08-25T12:00:00Z level=ERROR msg="db down" request.id=7
//! ```
//!
//! Grouped attribute keys are rendered dotted.

use super::Binding;
use crate::error::Result;
use crate::record::{Attr, Level, Record};
use crate::traits::render::{Render, RenderOptions};
use chrono::SecondsFormat;
use serde_json::Value;

/// Renderer producing one `key=value` line per record
#[derive(Debug, Clone)]
pub struct TextRenderer {
    opts: RenderOptions,
    binding: Binding,
}

impl TextRenderer {
    /// Create a text renderer with the given options
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            opts,
            binding: Binding::default(),
        }
    }
}

impl Render for TextRenderer {
    fn enabled(&self, level: Level) -> bool {
        level >= self.opts.level
    }

    fn render(&self, record: &Record) -> Result<String> {
        let mut line = String::with_capacity(128);
        line.push_str("time=");
        line.push_str(&record.time.to_rfc3339_opts(SecondsFormat::Secs, true));
        line.push_str(" level=");
        line.push_str(record.level.as_str());
        line.push_str(" msg=");
        line.push_str(&quote_if_needed(&record.message));

        for (path, attr) in self.binding.bound() {
            push_attr(&mut line, path, attr);
        }
        for attr in &record.attrs {
            push_attr(&mut line, self.binding.groups(), attr);
        }

        line.push('\n');
        Ok(line)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Box<dyn Render> {
        Box::new(Self {
            opts: self.opts,
            binding: self.binding.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Box<dyn Render> {
        Box::new(Self {
            opts: self.opts,
            binding: self.binding.with_group(name),
        })
    }
}

fn push_attr(line: &mut String, path: &[String], attr: &Attr) {
    line.push(' ');
    for group in path {
        line.push_str(group);
        line.push('.');
    }
    line.push_str(&attr.key);
    line.push('=');
    line.push_str(&format_value(&attr.value));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote_if_needed(s),
        other => other.to_string(),
    }
}

fn quote_if_needed(s: &str) -> String {
    if s.is_empty() || s.contains([' ', '"', '=']) {
        format!("{:?}", s)
    } else {
        s.to_string()
    }
}
