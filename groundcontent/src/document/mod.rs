// Document I/O - path resolution, raw reads, YAML front matter splitting

use crate::error::{ContentError, ErrorKind, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Matches a complete front matter block at the very start of a file.
static FRONTMATTER_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)\A---[ \t]*\r?\n(?P<yaml>.*?)^---[ \t]*(?:\r?\n|\z)")
        .expect("front matter block pattern is valid")
});

/// Matches an opening fence, used to tell "no front matter" from "unterminated".
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*(?:\r?\n|\z)").expect("opening fence pattern is valid")
});

/// A text blob split into its front matter mapping and remaining body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub metadata: Map<String, Value>,
    pub body: String,
}

/// Resolve a path to an absolute path against the process working directory.
/// No I/O is performed; the path does not need to exist. Paths containing a
/// NUL byte can never name a file and are rejected here.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(ContentError::new(
            ErrorKind::PathResolution,
            format!(
                "Failed to resolve path '{}': path contains a NUL byte",
                path.display()
            ),
        ));
    }
    std::path::absolute(path).map_err(|e| {
        ContentError::new(
            ErrorKind::PathResolution,
            format!("Failed to resolve path '{}': {e}", path.display()),
        )
        .with_source(e)
    })
}

/// Resolve `relative` against `base` rather than the working directory.
/// Absolute inputs are returned as-is.
pub fn resolve_against(base: &Path, relative: &Path) -> Result<PathBuf> {
    if relative.as_os_str().is_empty() {
        return Err(ContentError::new(
            ErrorKind::PathResolution,
            format!("Cannot resolve an empty path against '{}'", base.display()),
        ));
    }
    resolve_path(&base.join(relative))
}

/// Read a Markdown file's raw text, front matter included.
pub fn read_markdown_file(path: &Path) -> Result<String> {
    let resolved = resolve_path(path)?;
    read_text(&resolved, "Markdown")
}

/// Read a UTF-8 file, reporting a missing file distinctly from other I/O failures.
/// `label` names the kind of file in messages ("Markdown", "JSON").
pub(crate) fn read_text(path: &Path, label: &str) -> Result<String> {
    log::trace!("Reading {label} file {}", path.display());
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ContentError::new(
                ErrorKind::NotFound,
                format!("{label} file not found: {}", path.display()),
            )
            .with_path(path)
            .with_source(e)
        } else {
            ContentError::new(
                ErrorKind::ReadFailure,
                format!("Failed to read {label} file {}: {e}", path.display()),
            )
            .with_path(path)
            .with_source(e)
        }
    })
}

/// Split text into its YAML front matter mapping and body.
///
/// Text without an opening `---` fence has no metadata and is all body. An
/// opening fence without a closing one, invalid YAML, or YAML that is not a
/// mapping are all front matter errors. The body starts after the line break
/// that follows the closing fence.
pub fn split_frontmatter(text: &str) -> Result<Frontmatter> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(caps) = FRONTMATTER_BLOCK.captures(text) else {
        if OPENING_FENCE.is_match(text) {
            return Err(ContentError::new(
                ErrorKind::FrontmatterParse,
                "Failed to parse front matter: missing closing '---' fence",
            ));
        }
        return Ok(Frontmatter {
            metadata: Map::new(),
            body: text.to_string(),
        });
    };

    let yaml = caps.name("yaml").map_or("", |m| m.as_str());
    let body_start = caps.get(0).map_or(0, |m| m.end());
    let body = text[body_start..].to_string();

    if yaml.trim().is_empty() {
        return Ok(Frontmatter {
            metadata: Map::new(),
            body,
        });
    }

    let parsed: Value = serde_yaml::from_str(yaml).map_err(|e| {
        ContentError::new(
            ErrorKind::FrontmatterParse,
            format!("Failed to parse front matter: {e}"),
        )
        .with_source(e)
    })?;

    match parsed {
        Value::Object(metadata) => Ok(Frontmatter { metadata, body }),
        Value::Null => Ok(Frontmatter {
            metadata: Map::new(),
            body,
        }),
        other => Err(ContentError::new(
            ErrorKind::FrontmatterParse,
            format!(
                "Failed to parse front matter: expected a mapping, got {}",
                json_type_name(&other)
            ),
        )),
    }
}

/// Human-readable name of a JSON value's type, used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
