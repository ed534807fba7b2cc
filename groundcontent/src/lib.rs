//! Build-time content collections.
//!
//! A collection is loaded from either a JSON file holding an array of records
//! or a directory of Markdown files with YAML front matter. Records can be
//! checked against a [`Schema`], reshaped by a transform, and are then exposed
//! as an immutable [`Collection`].
//!
//! ```no_run
//! use groundcontent::{load_collection, parse_schema, CollectionConfig};
//!
//! # fn main() -> groundcontent::Result<()> {
//! let schema = parse_schema("schemas/post.yaml".as_ref())?;
//! let posts = load_collection(CollectionConfig::new("content/posts").schema(&schema))?;
//! if let Some(post) = posts.get_by_id("hello-world") {
//!     println!("{}", post["title"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod document;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod schema;
pub mod validation;

/// One content item: normally a JSON object keyed by field name.
pub type Record = serde_json::Value;

pub use collection::{load_collection, Collection, CollectionConfig, Format};
pub use document::{read_markdown_file, split_frontmatter, Frontmatter};
pub use error::{ContentError, ErrorKind, ItemPosition, Result};
pub use loader::{load_json_file, load_markdown_directory};
pub use manifest::Manifest;
pub use schema::{parse_schema, parse_schema_str, FieldError, RecordSchema, Schema};
pub use validation::validate_records;
