//! Transient edit buffer.
//!
//! The draft is a copy of the fields being edited; it never aliases a
//! stored post and is never persisted.

use crate::model::post::{Post, PostId};

/// Unsaved editor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDraft {
    pub title: String,
    /// Comma-separated tag input.
    pub tags_input: String,
    pub content: String,
    /// Post being edited, `None` for a new post.
    pub editing_id: Option<PostId>,
}

impl EditorDraft {
    /// Copies `post` into a fresh draft.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            tags_input: format_tags(&post.tags),
            content: post.content.clone(),
            editing_id: Some(post.id.clone()),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self, id: &PostId) -> bool {
        self.editing_id.as_ref() == Some(id)
    }

    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_input)
    }
}

/// Splits comma-separated input; pieces are trimmed and empties dropped.
/// Order and duplicates are kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tags back into editable input.
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}
