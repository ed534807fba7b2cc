// Source loaders - JSON arrays and directories of Markdown files

pub mod json;
pub mod markdown;

pub use json::load_json_file;
pub use markdown::{load_markdown_directory, MARKDOWN_EXTENSIONS};

/// Field that receives Markdown body text.
pub const BODY_FIELD: &str = "body";

/// JSON record field naming a Markdown file to merge in as the body.
pub const CONTENT_PATH_FIELD: &str = "contentPath";
