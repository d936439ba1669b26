//! Post domain model.
//!
//! # Responsibility
//! - Define the blog post record and its JSON shape.
//! - Validate title/id invariants before a post enters the store.
//!
//! # Invariants
//! - `id` is opaque; imported ids are kept verbatim.
//! - `title` is stored trimmed.
//! - Timestamps are Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation failure for a post record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Identifier is empty or whitespace-only.
    EmptyId,
}

impl Display for PostValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Please add a title"),
            Self::EmptyId => write!(f, "post id cannot be empty"),
        }
    }
}

impl Error for PostValidationError {}

/// A single blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Raw markdown-like source.
    pub content: String,
    /// Ordered, duplicates allowed.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub published: bool,
}

impl Post {
    /// Builds a new post stamped with `now_ms` for both timestamps.
    ///
    /// The title is trimmed; call [`Post::validate`] before storing.
    pub fn new(
        title: &str,
        content: impl Into<String>,
        tags: Vec<String>,
        published: bool,
        now_ms: i64,
    ) -> Self {
        Self {
            id: PostId::generate(),
            title: title.trim().to_string(),
            content: content.into(),
            tags,
            created_at: now_ms,
            updated_at: now_ms,
            published,
        }
    }

    pub fn validate(&self) -> Result<(), PostValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(PostValidationError::EmptyId);
        }
        validate_title(&self.title)
    }

    /// Unpublished posts are drafts.
    pub fn is_draft(&self) -> bool {
        !self.published
    }
}

/// Rejects empty or whitespace-only titles.
pub fn validate_title(title: &str) -> Result<(), PostValidationError> {
    if title.trim().is_empty() {
        Err(PostValidationError::EmptyTitle)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_title, Post, PostId, PostValidationError};

    #[test]
    fn new_post_trims_title_and_stamps_both_timestamps() {
        let post = Post::new("  Hello  ", "body", vec!["a".to_string()], false, 42);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.created_at, 42);
        assert_eq!(post.updated_at, 42);
        assert!(post.is_draft());
        assert!(post.validate().is_ok());
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(PostId::generate(), PostId::generate());
    }

    #[test]
    fn whitespace_title_is_rejected() {
        assert_eq!(validate_title(" \t\n"), Err(PostValidationError::EmptyTitle));
    }

    #[test]
    fn json_shape_uses_camel_case_fields() {
        let mut post = Post::new("T", "c", vec![], true, 7);
        post.id = PostId::from("abc");
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["createdAt"], 7);
        assert_eq!(value["updatedAt"], 7);
        assert_eq!(value["published"], true);
    }
}
