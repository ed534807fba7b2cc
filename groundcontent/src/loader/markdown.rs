use crate::document::{read_text, resolve_path, split_frontmatter};
use crate::error::{ContentError, ErrorKind, Result};
use crate::loader::BODY_FIELD;
use crate::Record;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// File extensions recognized as Markdown content, compared case-insensitively.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Load every Markdown file directly inside `dir` as one record.
///
/// Each record is the file's front matter with a `body` field holding the
/// text after it. Subdirectories are not traversed and records come back in
/// directory listing order.
pub fn load_markdown_directory(dir: &Path) -> Result<Vec<Record>> {
    let dir = resolve_path(dir)?;
    let files = list_content_files(&dir)?;

    let mut records = Vec::with_capacity(files.len());
    for file in &files {
        records.push(load_markdown_record(file)?);
    }

    log::debug!(
        "Loaded {} Markdown records from {}",
        records.len(),
        dir.display()
    );
    Ok(records)
}

fn list_content_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(dir).map_err(|e| {
        ContentError::new(
            ErrorKind::AccessFailure,
            format!("Cannot access directory {}: {e}", dir.display()),
        )
        .with_path(dir)
        .with_source(e)
    })?;

    if !metadata.is_dir() {
        return Err(ContentError::new(
            ErrorKind::NotADirectory,
            format!(
                "Expected a directory of Markdown files, but {} is not a directory",
                dir.display()
            ),
        )
        .with_path(dir));
    }

    let read_failure = |e: std::io::Error| {
        ContentError::new(
            ErrorKind::ReadFailure,
            format!("Failed to read directory {}: {e}", dir.display()),
        )
        .with_path(dir)
        .with_source(e)
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_failure)? {
        let path = entry.map_err(read_failure)?.path();
        if !has_markdown_extension(&path) {
            continue;
        }
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                log::warn!("Skipping {}: cannot stat entry: {e}", path.display());
            }
        }
    }

    if files.is_empty() {
        return Err(ContentError::new(
            ErrorKind::EmptyDirectory,
            format!(
                "No Markdown files (.{}) found in directory {}",
                MARKDOWN_EXTENSIONS.join(", ."),
                dir.display()
            ),
        )
        .with_path(dir));
    }

    Ok(files)
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn load_markdown_record(file: &Path) -> Result<Record> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let text = read_text(file, "Markdown").map_err(|e| {
        ContentError::new(
            ErrorKind::ReadFailure,
            format!("Failed to read Markdown file {name}: {}", e.message()),
        )
        .with_path(file)
        .at_file(name.clone())
        .with_source(e)
    })?;

    let parsed = split_frontmatter(&text).map_err(|e| {
        ContentError::new(
            ErrorKind::FrontmatterParse,
            format!("Invalid front matter in {name}: {}", e.message()),
        )
        .with_path(file)
        .at_file(name.clone())
        .with_source(e)
    })?;

    let mut record = parsed.metadata;
    record.insert(BODY_FIELD.to_string(), Value::String(parsed.body));
    Ok(Value::Object(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn by_id<'a>(records: &'a [Record], id: &str) -> &'a Record {
        records
            .iter()
            .find(|r| r["id"] == json!(id))
            .unwrap_or_else(|| panic!("no record with id {id}"))
    }

    #[test]
    fn test_load_single_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "x.md", "---\nid: x\ntitle: T\n---\nHello");

        let records = load_markdown_directory(tmp.path()).unwrap();
        assert_eq!(records, vec![json!({"id": "x", "title": "T", "body": "Hello"})]);
    }

    #[test]
    fn test_load_many_files_and_mdx() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "---\nid: a\n---\nA");
        write(tmp.path(), "b.MD", "---\nid: b\n---\nB");
        write(tmp.path(), "c.mdx", "---\nid: c\n---\n<C />");

        let records = load_markdown_directory(tmp.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(by_id(&records, "b")["body"], json!("B"));
        assert_eq!(by_id(&records, "c")["body"], json!("<C />"));
    }

    #[test]
    fn test_ignores_other_files_and_subdirectories() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "---\nid: a\n---\nA");
        write(tmp.path(), "notes.txt", "not content");
        write(tmp.path(), "data.json", "[]");
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        write(&tmp.path().join("nested"), "deep.md", "---\nid: deep\n---\n");
        std::fs::create_dir(tmp.path().join("folder.md")).unwrap();

        let records = load_markdown_directory(tmp.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], json!("a"));
    }

    #[test]
    fn test_body_overrides_frontmatter_body_key() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "---\nid: a\nbody: from metadata\n---\nreal body");

        let records = load_markdown_directory(tmp.path()).unwrap();
        assert_eq!(records[0]["body"], json!("real body"));
    }

    #[test]
    fn test_file_without_frontmatter() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "plain.md", "Just text");

        let records = load_markdown_directory(tmp.path()).unwrap();
        assert_eq!(records, vec![json!({"body": "Just text"})]);
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "readme.txt", "nothing here");

        let err = load_markdown_directory(tmp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDirectory);
        assert!(err.message().contains("No Markdown files"));
        assert!(err
            .message()
            .contains(&tmp.path().display().to_string()));
    }

    #[test]
    fn test_malformed_path_fails_resolution() {
        let err = load_markdown_directory(Path::new("posts\0dir")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathResolution);
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = load_markdown_directory(&tmp.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessFailure);
    }

    #[test]
    fn test_path_is_a_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "---\nid: a\n---\n");

        let err = load_markdown_directory(&tmp.path().join("a.md")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }

    #[test]
    fn test_bad_frontmatter_fails_whole_load() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", "---\nid: good\n---\n");
        write(tmp.path(), "bad.md", "---\ntitle: [oops\n---\n");

        let err = load_markdown_directory(tmp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FrontmatterParse);
        assert_eq!(err.item(), Some(&crate::ItemPosition::File("bad.md".into())));
        assert!(err.message().contains("bad.md"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "---\nid: a\n---\n");
        std::os::unix::fs::symlink(tmp.path().join("gone.md"), tmp.path().join("link.md"))
            .unwrap();

        let records = load_markdown_directory(tmp.path()).unwrap();
        assert_eq!(records.len(), 1);
    }
}
