use crate::document::{json_type_name, read_markdown_file, read_text, resolve_against, resolve_path};
use crate::error::{ContentError, ErrorKind, Result};
use crate::loader::{BODY_FIELD, CONTENT_PATH_FIELD};
use crate::Record;
use serde_json::Value;
use std::path::Path;

/// Load a JSON file whose top level is an array of records.
///
/// Object records with a non-blank string `contentPath` get a `body` field
/// holding the raw text of that Markdown file, resolved relative to the JSON
/// file's directory. A link that cannot be read fails the whole load.
pub fn load_json_file(path: &Path) -> Result<Vec<Record>> {
    let path = resolve_path(path)?;
    let text = read_text(&path, "JSON")?;

    let parsed: Value = serde_json::from_str(&text).map_err(|e| {
        ContentError::new(
            ErrorKind::ParseFailure,
            format!("Failed to parse JSON in {}: {e}", path.display()),
        )
        .with_path(&path)
        .with_source(e)
    })?;

    let items = match parsed {
        Value::Array(items) => items,
        other => {
            return Err(ContentError::new(
                ErrorKind::NotAnArray,
                format!(
                    "Expected a JSON array at the top level of {}, got {}",
                    path.display(),
                    json_type_name(&other)
                ),
            )
            .with_path(&path))
        }
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));

    let mut records = Vec::with_capacity(items.len());
    let mut linked = 0;
    for (index, item) in items.into_iter().enumerate() {
        let link = content_link(&item).map(str::to_owned);
        let record = match link {
            Some(link) => {
                linked += 1;
                let body = read_linked_body(&link, base_dir).map_err(|e| {
                    ContentError::new(
                        ErrorKind::LinkedContent,
                        format!(
                            "Failed to load markdown content for item at index {index} in {}: {}",
                            path.display(),
                            e.message()
                        ),
                    )
                    .with_path(&path)
                    .at_index(index)
                    .with_source(e)
                })?;
                with_body(item, body)
            }
            None => item,
        };
        records.push(record);
    }

    log::debug!(
        "Loaded {} JSON records ({linked} linked) from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// The cross-link target of a record, if it carries a usable one.
fn content_link(item: &Value) -> Option<&str> {
    item.as_object()?
        .get(CONTENT_PATH_FIELD)?
        .as_str()
        .filter(|link| !link.trim().is_empty())
}

fn read_linked_body(link: &str, base_dir: &Path) -> Result<String> {
    let target = resolve_against(base_dir, Path::new(link))?;
    read_markdown_file(&target)
}

fn with_body(item: Value, body: String) -> Record {
    match item {
        Value::Object(mut record) => {
            record.insert(BODY_FIELD.to_string(), Value::String(body));
            Value::Object(record)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_plain_array_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("items.json");
        write(&file, r#"[{"id": "c"}, {"id": "a"}, {"id": "b"}, {"id": "a"}]"#);

        let records = load_json_file(&file).unwrap();
        assert_eq!(
            records,
            vec![json!({"id": "c"}), json!({"id": "a"}), json!({"id": "b"}), json!({"id": "a"})]
        );
    }

    #[test]
    fn test_linked_markdown_is_merged_as_body() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("data/posts.json");
        write(&file, r#"[{"id": "p1", "contentPath": "docs/p1.md"}, {"id": "p2"}]"#);
        write(&tmp.path().join("data/docs/p1.md"), "Body text");

        let records = load_json_file(&file).unwrap();
        assert_eq!(
            records,
            vec![
                json!({"id": "p1", "contentPath": "docs/p1.md", "body": "Body text"}),
                json!({"id": "p2"}),
            ]
        );
    }

    #[test]
    fn test_linked_markdown_keeps_frontmatter_raw() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts.json");
        write(&file, r#"[{"id": "p1", "contentPath": "p1.md"}]"#);
        write(&tmp.path().join("p1.md"), "---\ntitle: T\n---\nBody");

        let records = load_json_file(&file).unwrap();
        assert_eq!(records[0]["body"], json!("---\ntitle: T\n---\nBody"));
    }

    #[test]
    fn test_unusable_links_leave_record_unchanged() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts.json");
        write(
            &file,
            r#"[
                {"id": "empty", "contentPath": ""},
                {"id": "blank", "contentPath": "   "},
                {"id": "number", "contentPath": 42},
                {"id": "null", "contentPath": null},
                "not an object",
                7
            ]"#,
        );

        let records = load_json_file(&file).unwrap();
        assert_eq!(
            records,
            vec![
                json!({"id": "empty", "contentPath": ""}),
                json!({"id": "blank", "contentPath": "   "}),
                json!({"id": "number", "contentPath": 42}),
                json!({"id": "null", "contentPath": null}),
                json!("not an object"),
                json!(7),
            ]
        );
    }

    #[test]
    fn test_missing_link_fails_with_index() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts.json");
        write(
            &file,
            r#"[{"id": "ok"}, {"id": "broken", "contentPath": "missing.md"}]"#,
        );

        let err = load_json_file(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LinkedContent);
        assert_eq!(err.item_index(), Some(1));
        assert_eq!(err.file_path(), Some(file.as_path()));
        assert!(err
            .message()
            .contains("load markdown content for item at index 1"));
        assert!(err.message().contains("file not found"));
        assert!(err.message().contains(&file.display().to_string()));
    }

    #[test]
    fn test_malformed_path_fails_resolution() {
        let err = load_json_file(Path::new("posts\0.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathResolution);
    }

    #[test]
    fn test_malformed_link_fails_resolution_with_index() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts.json");
        write(&file, r#"[{"id": "a", "contentPath": "bad\u0000.md"}]"#);

        let err = load_json_file(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LinkedContent);
        assert_eq!(err.item_index(), Some(0));
        assert!(err.message().contains("NUL byte"));
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_json_file(&tmp.path().join("nope.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().contains("JSON file not found"));
    }

    #[test]
    fn test_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("bad.json");
        write(&file, "[{\"id\": ");

        let err = load_json_file(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(err.message().starts_with("Failed to parse JSON"));
    }

    #[test]
    fn test_top_level_object_is_not_an_array() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("obj.json");
        write(&file, r#"{"id": "a"}"#);

        let err = load_json_file(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAnArray);
        assert!(err.message().contains("got object"));
    }

    #[test]
    fn test_empty_array() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("empty.json");
        write(&file, "[]");

        assert!(load_json_file(&file).unwrap().is_empty());
    }
}
