//! JSON export and import of the whole post collection.
//!
//! # Responsibility
//! - Encode the collection as a pretty JSON array for download.
//! - Decode an uploaded file, accepting only a top-level array of posts.
//!
//! # Invariants
//! - Export then import preserves every id and field value.
//! - Import never partially applies; callers replace the collection only
//!   after a successful decode.

use crate::model::post::Post;
use crate::render::text::export_file_name;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Export/import failure.
#[derive(Debug)]
pub enum ExchangeError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Parsed JSON is valid but not an array.
    NotAnArray,
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid post JSON: {err}"),
            Self::NotAnArray => write!(f, "import file must contain a JSON array of posts"),
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotAnArray => None,
        }
    }
}

impl From<std::io::Error> for ExchangeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes posts as a two-space indented JSON array.
pub fn export_posts(posts: &[Post]) -> Result<String, ExchangeError> {
    Ok(serde_json::to_string_pretty(posts)?)
}

/// Writes an export file named after `now_ms` into `dir`.
pub fn write_export(dir: &Path, posts: &[Post], now_ms: i64) -> Result<PathBuf, ExchangeError> {
    let path = dir.join(export_file_name(now_ms));
    std::fs::write(&path, export_posts(posts)?)?;
    Ok(path)
}

/// Decodes an import payload.
pub fn import_posts(text: &str) -> Result<Vec<Post>, ExchangeError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(ExchangeError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

/// Reads and decodes an import file.
pub fn read_import(path: &Path) -> Result<Vec<Post>, ExchangeError> {
    import_posts(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::{export_posts, import_posts, read_import, write_export, ExchangeError};
    use crate::model::post::Post;

    #[test]
    fn export_is_pretty_printed_array() {
        let posts = vec![Post::new("T", "c", vec![], false, 1)];
        let text = export_posts(&posts).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"updatedAt\": 1"));
    }

    #[test]
    fn written_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let posts = vec![
            Post::new("A", "x", vec!["t".to_string()], true, 10),
            Post::new("B", "", vec![], false, 20),
        ];
        let path = write_export(dir.path(), &posts, 0).unwrap();
        assert!(path.ends_with("blog-posts-1970-01-01.json"));
        assert_eq!(read_import(&path).unwrap(), posts);
    }

    #[test]
    fn missing_import_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_import(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ExchangeError::Io(_)));
    }

    #[test]
    fn non_array_json_is_rejected() {
        assert!(matches!(
            import_posts(r#"{"id":"x"}"#),
            Err(ExchangeError::NotAnArray)
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(import_posts("[{"), Err(ExchangeError::Json(_))));
    }

    #[test]
    fn missing_optional_fields_default() {
        let posts = import_posts(
            r#"[{"id":"a1","title":"T","content":"","createdAt":1,"updatedAt":2}]"#,
        )
        .unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].tags.is_empty());
        assert!(!posts[0].published);
    }
}
