use crate::document::json_type_name;
use crate::error::{ContentError, ErrorKind, Result};
use crate::schema::{FieldDefinition, FieldError, FieldType, RecordSchema, Schema};
use crate::Record;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Run every record through `schema`, returning the normalized records.
///
/// Stops at the first invalid record; its field errors are joined into the
/// message and the error points at `origin` and the record's index.
pub fn validate_records(
    records: Vec<Record>,
    schema: &dyn Schema,
    origin: &Path,
) -> Result<Vec<Record>> {
    let mut validated = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        match schema.validate(record) {
            Ok(normalized) => validated.push(normalized),
            Err(errors) => {
                let details = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(ContentError::new(
                    ErrorKind::ValidationFailure,
                    format!("Validation failed for item at index {index}: {details}"),
                )
                .with_path(origin)
                .at_index(index));
            }
        }
    }

    log::debug!(
        "Validated {} records from {}",
        validated.len(),
        origin.display()
    );
    Ok(validated)
}

impl Schema for RecordSchema {
    /// Check required fields, types and enums, and fill in defaults.
    fn validate(&self, value: Value) -> std::result::Result<Value, Vec<FieldError>> {
        let mut errors = Vec::new();

        let mut mapping = match value {
            Value::Object(mapping) => mapping,
            other => {
                return Err(vec![FieldError::new(
                    "(root)",
                    format!("expected object, got {}", json_type_name(&other)),
                )])
            }
        };

        normalize_object(
            None,
            &self.fields,
            self.additional_properties,
            &mut mapping,
            &mut errors,
        );

        if errors.is_empty() {
            Ok(Value::Object(mapping))
        } else {
            Err(errors)
        }
    }
}

fn field_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}

fn normalize_object(
    prefix: Option<&str>,
    fields: &BTreeMap<String, FieldDefinition>,
    additional_properties: bool,
    mapping: &mut Map<String, Value>,
    errors: &mut Vec<FieldError>,
) {
    for (name, def) in fields {
        let path = field_path(prefix, name);

        if let Some(value) = mapping.get_mut(name).filter(|v| !v.is_null()) {
            normalize_value(&path, def, value, errors);
        } else if let Some(default) = &def.default {
            mapping.insert(name.clone(), default.clone());
        } else if def.required {
            errors.push(FieldError::new(path, "is required"));
        }
    }

    if !additional_properties {
        for key in mapping.keys() {
            if !fields.contains_key(key) {
                errors.push(FieldError::new(
                    field_path(prefix, key),
                    "unexpected field (additional_properties is false)",
                ));
            }
        }
    }
}

fn normalize_value(path: &str, def: &FieldDefinition, value: &mut Value, errors: &mut Vec<FieldError>) {
    let type_matches = match def.field_type {
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Date | FieldType::Datetime => value.is_string(),
        FieldType::List => value.is_array(),
        FieldType::Object => value.is_object(),
        FieldType::Any => true,
    };

    if !type_matches {
        errors.push(FieldError::new(
            path,
            format!(
                "expected {}, got {}",
                def.field_type.as_str(),
                json_type_name(value)
            ),
        ));
        return;
    }

    match value {
        Value::String(s) => check_string(path, def, s, errors),
        Value::Array(items) => {
            if let Some(item_type) = &def.items {
                let item_def = item_type.definition();
                for (i, item) in items.iter_mut().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    if item.is_null() {
                        if item_def.required {
                            errors.push(FieldError::new(item_path, "is required"));
                        }
                        continue;
                    }
                    normalize_value(&item_path, &item_def, item, errors);
                }
            }
        }
        Value::Object(mapping) => {
            if let Some(fields) = &def.fields {
                normalize_object(Some(path), fields, true, mapping, errors);
            }
        }
        _ => {}
    }
}

fn check_string(path: &str, def: &FieldDefinition, s: &str, errors: &mut Vec<FieldError>) {
    match def.field_type {
        FieldType::Date => {
            if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                errors.push(FieldError::new(
                    path,
                    format!("'{s}' is not a valid date (expected YYYY-MM-DD)"),
                ));
            }
        }
        FieldType::Datetime => {
            if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                errors.push(FieldError::new(
                    path,
                    format!("'{s}' is not a valid RFC 3339 datetime"),
                ));
            }
        }
        _ => {}
    }

    if let Some(enum_values) = &def.enum_values {
        if !enum_values.iter().any(|v| v == s) {
            errors.push(FieldError::new(
                path,
                format!("value '{s}' is not one of: {}", enum_values.join(", ")),
            ));
        }
    }
}
