use super::types::RecordSchema;
use crate::document::{read_text, resolve_path};
use crate::error::{ContentError, ErrorKind, Result};
use std::path::Path;

/// Parse a schema YAML file into a RecordSchema
pub fn parse_schema(path: &Path) -> Result<RecordSchema> {
    let path = resolve_path(path)?;
    let content = read_text(&path, "Schema")?;
    parse_schema_str(&content).map_err(|e| e.with_path(&path))
}

/// Parse a schema YAML string into a RecordSchema
pub fn parse_schema_str(content: &str) -> Result<RecordSchema> {
    serde_yaml::from_str(content).map_err(|e| {
        ContentError::new(ErrorKind::ParseFailure, format!("Invalid schema: {e}")).with_source(e)
    })
}
