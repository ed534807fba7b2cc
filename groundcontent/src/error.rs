use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which stage of the pipeline raised a [`ContentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PathResolution,
    NotFound,
    ReadFailure,
    AccessFailure,
    NotADirectory,
    EmptyDirectory,
    FrontmatterParse,
    ParseFailure,
    NotAnArray,
    ValidationFailure,
    LinkedContent,
    Manifest,
    Deserialize,
}

/// Position of the offending item inside its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPosition {
    /// Index into a JSON array (or into the loaded record sequence).
    Index(usize),
    /// File name of a Markdown item. Rendered as `Item: <name>` rather than
    /// `Item index: <n>`, because directory listing order is not a stable
    /// position to report.
    File(String),
}

impl fmt::Display for ItemPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemPosition::Index(i) => write!(f, "{i}"),
            ItemPosition::File(name) => f.write_str(name),
        }
    }
}

/// The single error type raised anywhere in the content pipeline.
///
/// Callers branch on [`ContentError::kind`], [`ContentError::file_path`] and
/// [`ContentError::item`] rather than on distinct error types.
#[derive(Error, Debug)]
#[error("{message}{}", render_context(.file_path, .item))]
pub struct ContentError {
    kind: ErrorKind,
    message: String,
    file_path: Option<PathBuf>,
    item: Option<ItemPosition>,
    #[source]
    source: Option<BoxError>,
}

fn render_context(file_path: &Option<PathBuf>, item: &Option<ItemPosition>) -> String {
    let mut out = String::new();
    if let Some(path) = file_path {
        out.push_str(&format!("\n  File: {}", path.display()));
    }
    match item {
        Some(ItemPosition::Index(i)) => out.push_str(&format!("\n  Item index: {i}")),
        Some(ItemPosition::File(name)) => out.push_str(&format!("\n  Item: {name}")),
        None => {}
    }
    out
}

impl ContentError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ContentError {
            kind,
            message: message.into(),
            file_path: None,
            item: None,
            source: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.item = Some(ItemPosition::Index(index));
        self
    }

    pub fn at_file(mut self, name: impl Into<String>) -> Self {
        self.item = Some(ItemPosition::File(name.into()));
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The bare message, without the file/item context lines.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn item(&self) -> Option<&ItemPosition> {
        self.item.as_ref()
    }

    /// Numeric item position, when the error points at an array index.
    pub fn item_index(&self) -> Option<usize> {
        match self.item {
            Some(ItemPosition::Index(i)) => Some(i),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
