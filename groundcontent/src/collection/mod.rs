use crate::error::{ContentError, ErrorKind, Result};
use crate::loader::{load_json_file, load_markdown_directory};
use crate::schema::Schema;
use crate::validation::validate_records;
use crate::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Source format of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// A single JSON file holding an array of records.
    #[serde(rename = "json")]
    Json,
    /// A directory of Markdown files with YAML front matter.
    #[serde(rename = "md", alias = "markdown")]
    Markdown,
}

impl Format {
    /// Infer the format from a path alone: `.json` (any case) is JSON,
    /// anything else is a Markdown directory.
    pub fn infer(path: &Path) -> Format {
        let is_json = path
            .as_os_str()
            .to_string_lossy()
            .to_ascii_lowercase()
            .ends_with(".json");
        if is_json {
            Format::Json
        } else {
            Format::Markdown
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Markdown => f.write_str("md"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "md" | "markdown" => Ok(Format::Markdown),
            other => Err(format!("Unknown format '{other}' (expected 'json' or 'md')")),
        }
    }
}

type Transform<'a> = Box<dyn FnOnce(Vec<Record>) -> Vec<Record> + 'a>;

/// Everything needed to assemble one collection.
pub struct CollectionConfig<'a> {
    pub path: PathBuf,
    pub format: Option<Format>,
    pub schema: Option<&'a dyn Schema>,
    pub transform: Option<Transform<'a>>,
}

impl<'a> CollectionConfig<'a> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CollectionConfig {
            path: path.into(),
            format: None,
            schema: None,
            transform: None,
        }
    }

    /// Force a format instead of inferring it from the path.
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn schema(mut self, schema: &'a dyn Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Reshape the records once after validation. The returned sequence
    /// replaces the loaded one entirely.
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: FnOnce(Vec<Record>) -> Vec<Record> + 'a,
    {
        self.transform = Some(Box::new(transform));
        self
    }
}

impl fmt::Debug for CollectionConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("schema", &self.schema.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Load, validate and transform a collection.
///
/// Every call reads the filesystem afresh and returns an independent
/// collection. Any failure aborts the whole collection.
pub fn load_collection(config: CollectionConfig<'_>) -> Result<Collection> {
    let CollectionConfig {
        path,
        format,
        schema,
        transform,
    } = config;

    let format = format.unwrap_or_else(|| Format::infer(&path));
    log::debug!("Loading {format} collection from {}", path.display());

    let mut records = match format {
        Format::Json => load_json_file(&path)?,
        Format::Markdown => load_markdown_directory(&path)?,
    };

    if let Some(schema) = schema {
        records = validate_records(records, schema, &path)?;
    }

    if let Some(transform) = transform {
        let before = records.len();
        records = transform(records);
        log::debug!("Transform reshaped {before} records into {}", records.len());
    }

    Ok(Collection { records })
}

/// An immutable, ordered set of content records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    records: Vec<Record>,
}

impl Collection {
    pub fn new(records: Vec<Record>) -> Self {
        Collection { records }
    }

    /// All records in order. The slice is a shared borrow, so the collection
    /// cannot be changed through it and repeated calls see the same records.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// First record whose `id` field is the string `id`. This is a linear scan.
    pub fn get_by_id(&self, id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.get("id").and_then(|v| v.as_str()) == Some(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    // ── Typed API ────────────────────────────────────────────────────

    /// Deserialize every record into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                T::deserialize(record).map_err(|e| {
                    ContentError::new(
                        ErrorKind::Deserialize,
                        format!("Failed to deserialize item at index {index}: {e}"),
                    )
                    .at_index(index)
                    .with_source(e)
                })
            })
            .collect()
    }

    /// Look up a record by id and deserialize it into `T`.
    pub fn get_typed<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>> {
        let Some(record) = self.get_by_id(id) else {
            return Ok(None);
        };
        T::deserialize(record).map(Some).map_err(|e| {
            ContentError::new(
                ErrorKind::Deserialize,
                format!("Failed to deserialize item '{id}': {e}"),
            )
            .with_source(e)
        })
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
