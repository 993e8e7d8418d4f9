//! Scenario-local state threading.
//!
//! Later steps in a scenario often need values an earlier step captured,
//! most commonly the server-assigned `id` from a create. Rather than relying
//! on lexical capture, state moves through an explicit [`ScenarioContext`]:
//! written once per key, read any number of times, discarded with the
//! scenario.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ContextError;

/// Captured values local to one scenario.
#[derive(Debug, Default)]
pub struct ScenarioContext {
    values: HashMap<String, Value>,
}

impl ScenarioContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a captured value. Each key is write-once within a scenario.
    pub fn capture(&mut self, key: &str, value: Value) -> Result<(), ContextError> {
        if self.values.contains_key(key) {
            return Err(ContextError::DuplicateCapture {
                key: key.to_string(),
            });
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Reads a captured value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Reads a captured value, failing when no earlier step produced it.
    pub fn require(&self, key: &str) -> Result<&Value, ContextError> {
        self.values.get(key).ok_or_else(|| ContextError::MissingCapture {
            key: key.to_string(),
        })
    }

    /// Expands `{key}` placeholders in a path template from captured values.
    ///
    /// Strings substitute without quotes, other values in their compact JSON
    /// form, so `/items/{id}` renders as `/items/42`.
    pub fn render_path(&self, template: &str) -> Result<String, ContextError> {
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            let close = after_open
                .find('}')
                .ok_or_else(|| ContextError::MalformedTemplate {
                    template: template.to_string(),
                })?;
            let key = &after_open[..close];
            match self.require(key)? {
                Value::String(s) => rendered.push_str(s),
                other => rendered.push_str(&other.to_string()),
            }
            rest = &after_open[close + 1..];
        }
        rendered.push_str(rest);

        Ok(rendered)
    }
}

/// Gets a value from a JSON body using dotted path notation, e.g. `id` or
/// `item.isbn13`.
pub fn extract<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = body;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}
