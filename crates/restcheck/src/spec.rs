//! Declarative request specs.
//!
//! A [`RequestSpec`] describes one HTTP call (method, path, optional JSON
//! body) without executing it. Construction is the only mutation point:
//! once built, a spec can be composed, logged, or replayed independently of
//! any transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpecError;

/// The HTTP verbs the items contract needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns the verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable description of one HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSpec {
    method: Method,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

impl RequestSpec {
    /// Builds a GET spec.
    pub fn get(path: impl Into<String>) -> Result<Self, SpecError> {
        Ok(Self {
            method: Method::Get,
            path: validated_path(path.into())?,
            body: None,
        })
    }

    /// Builds a DELETE spec.
    pub fn delete(path: impl Into<String>) -> Result<Self, SpecError> {
        Ok(Self {
            method: Method::Delete,
            path: validated_path(path.into())?,
            body: None,
        })
    }

    /// Builds a POST spec with an item-shaped body.
    pub fn post(path: impl Into<String>, body: Value) -> Result<Self, SpecError> {
        Ok(Self {
            method: Method::Post,
            path: validated_path(path.into())?,
            body: Some(validated_item_body(body)?),
        })
    }

    /// Builds a PUT spec with an item-shaped body.
    pub fn put(path: impl Into<String>, body: Value) -> Result<Self, SpecError> {
        Ok(Self {
            method: Method::Put,
            path: validated_path(path.into())?,
            body: Some(validated_item_body(body)?),
        })
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The target path, relative to the resource base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl std::fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

fn validated_path(path: String) -> Result<String, SpecError> {
    if path.is_empty() {
        return Err(SpecError::EmptyPath);
    }
    Ok(path)
}

/// Checks that a POST/PUT body is structurally item-shaped: a JSON object
/// carrying the four contract fields with the right JSON types. Extra keys
/// (such as an `id` echoed back into an update) pass through untouched;
/// semantic validity stays with the remote resource.
fn validated_item_body(body: Value) -> Result<Value, SpecError> {
    let object = match &body {
        Value::Object(map) => map,
        other => {
            return Err(SpecError::BodyNotAnObject {
                got: json_type_name(other).to_string(),
            });
        }
    };

    const STRING_FIELDS: [&str; 2] = ["type", "isbn13"];
    const NUMBER_FIELDS: [&str; 2] = ["price", "numberinstock"];

    for field in STRING_FIELDS {
        match object.get(field) {
            None => return Err(SpecError::MissingField { field }),
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(SpecError::FieldType {
                    field,
                    expected: "string",
                });
            }
        }
    }
    for field in NUMBER_FIELDS {
        match object.get(field) {
            None => return Err(SpecError::MissingField { field }),
            Some(Value::Number(_)) => {}
            Some(_) => {
                return Err(SpecError::FieldType {
                    field,
                    expected: "number",
                });
            }
        }
    }

    Ok(body)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
