//! Single-line JSON renderer
//!
//! Produces one JSON object per record with `time`, `level` and `msg` keys
//! followed by bound and per-record attributes. Groups nest as objects:
//!
//! ```text
//! {"time":"2026-08-25T12:00:00Z","level":"ERROR","msg":"db down","request":{"id":7}}
//! ```

use super::Binding;
use crate::error::Result;
use crate::record::{Attr, Level, Record};
use crate::traits::render::{Render, RenderOptions};
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Renderer producing one JSON object per record
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    opts: RenderOptions,
    binding: Binding,
}

impl JsonRenderer {
    /// Create a JSON renderer with the given options
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            opts,
            binding: Binding::default(),
        }
    }
}

impl Render for JsonRenderer {
    fn enabled(&self, level: Level) -> bool {
        level >= self.opts.level
    }

    fn render(&self, record: &Record) -> Result<String> {
        let mut root = Map::new();
        root.insert(
            "time".to_string(),
            Value::String(record.time.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        root.insert(
            "level".to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        root.insert("msg".to_string(), Value::String(record.message.clone()));

        for (path, attr) in self.binding.bound() {
            insert_nested(&mut root, path, &attr.key, attr.value.clone());
        }
        for attr in &record.attrs {
            insert_nested(&mut root, self.binding.groups(), &attr.key, attr.value.clone());
        }

        let mut line = serde_json::to_string(&Value::Object(root))?;
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

fn insert_nested(map: &mut Map<String, Value>, path: &[String], key: &str, value: Value) {
    match path.split_first() {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, rest, key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_renders_valid_json_line() {
        let renderer = JsonRenderer::new(RenderOptions::default());
        let line = renderer
            .render(&Record::new(Level::Error, "db down"))
            .unwrap();

        assert!(line.ends_with('\n'));
        let value = parse(&line);
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["msg"], "db down");
        assert!(value["time"].is_string());
    }

    #[test]
    fn test_record_attrs() {
        let renderer = JsonRenderer::new(RenderOptions::default());
        let line = renderer
            .render(&Record::new(Level::Info, "hi").attr("user_id", 42))
            .unwrap();
        assert_eq!(parse(&line)["user_id"], 42);
    }

    #[test]
    fn test_groups_nest_as_objects() {
        let renderer = JsonRenderer::new(RenderOptions::default())
            .with_attrs(vec![Attr::new("app", "api")])
            .with_group("request")
            .with_attrs(vec![Attr::new("id", 7)]);

        let line = renderer
            .render(&Record::new(Level::Info, "hi").attr("path", "/health"))
            .unwrap();
        let value = parse(&line);
        assert_eq!(value["app"], "api");
        assert_eq!(value["request"]["id"], 7);
        assert_eq!(value["request"]["path"], "/health");
    }

    #[test]
    fn test_enabled_respects_level() {
        let renderer = JsonRenderer::new(RenderOptions::new(Level::Error));
        assert!(!renderer.enabled(Level::Warn));
        assert!(renderer.enabled(Level::Error));
    }
}
