//! Default record renderers
//!
//! Two rendering backends are provided:
//! - [`TextRenderer`] - logfmt-style `key=value` lines
//! - [`JsonRenderer`] - single-line JSON objects
//!
//! Both honor the base level filter from [`RenderOptions`] and are immutable:
//! binding attributes or opening a group returns a new renderer, so derived
//! handlers never affect each other.

mod json;
mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

// Re-export the trait and options from traits for convenience
pub use crate::traits::render::{Render, RenderOptions};

use crate::record::Attr;

/// Attribute binding state shared by the built-in renderers: the currently
/// open group path and the attrs bound so far, each remembered with the group
/// path that was open when it was bound.
#[derive(Debug, Clone, Default)]
pub(crate) struct Binding {
    groups: Vec<String>,
    bound: Vec<(Vec<String>, Attr)>,
}

impl Binding {
    pub(crate) fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        let mut next = self.clone();
        next.bound
            .extend(attrs.into_iter().map(|a| (self.groups.clone(), a)));
        next
    }

    pub(crate) fn with_group(&self, name: &str) -> Self {
        // An empty group name adds no nesting
        if name.is_empty() {
            return self.clone();
        }
        let mut next = self.clone();
        next.groups.push(name.to_string());
        next
    }

    /// Attrs bound before this record, each with its group path
    pub(crate) fn bound(&self) -> &[(Vec<String>, Attr)] {
        &self.bound
    }

    /// Group path that applies to the record's own attrs
    pub(crate) fn groups(&self) -> &[String] {
        &self.groups
    }
}
