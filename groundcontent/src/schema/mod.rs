// Schema capability - anything that can normalize a record or report field errors

mod parser;
mod types;

pub use parser::{parse_schema, parse_schema_str};
pub use types::{FieldDefinition, FieldType, ItemType, RecordSchema};

use serde_json::Value;
use std::fmt;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path to the field (`author.name`, `tags[2]`), or `(root)`.
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Something that can check a candidate record and return its normalized form.
///
/// The collection pipeline only depends on this trait, so any validation
/// library can be plugged in. [`RecordSchema`] is the built-in implementation,
/// and plain closures work too:
///
/// ```
/// use groundcontent::schema::{FieldError, Schema};
/// use serde_json::{json, Value};
///
/// let has_id = |value: Value| {
///     if value.get("id").is_some_and(Value::is_string) {
///         Ok(value)
///     } else {
///         Err(vec![FieldError::new("id", "is required")])
///     }
/// };
/// assert!(has_id.validate(json!({"id": "a"})).is_ok());
/// ```
pub trait Schema {
    fn validate(&self, value: Value) -> Result<Value, Vec<FieldError>>;
}

impl<F> Schema for F
where
    F: Fn(Value) -> Result<Value, Vec<FieldError>>,
{
    fn validate(&self, value: Value) -> Result<Value, Vec<FieldError>> {
        self(value)
    }
}
