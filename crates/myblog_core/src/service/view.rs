//! Filter/sort pipeline from the stored collection to the display list.
//!
//! # Invariants
//! - Filtering never mutates the collection; results borrow from it.
//! - Query matching is a case-insensitive substring test over title,
//!   content and comma-joined tags.
//! - Ordering is by `updated_at` only; ties keep collection order.

use crate::model::post::Post;

/// Ordering by last-updated timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            Self::NewestFirst => Self::OldestFirst,
            Self::OldestFirst => Self::NewestFirst,
        }
    }
}

/// View parameters applied by [`visible_posts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub published_only: bool,
    pub query: String,
    pub sort: SortDirection,
}

/// Returns the posts to display, filtered and sorted per `options`.
pub fn visible_posts<'a>(posts: &'a [Post], options: &ViewOptions) -> Vec<&'a Post> {
    let query = options.query.trim().to_lowercase();

    let mut visible: Vec<&Post> = posts
        .iter()
        .filter(|post| !options.published_only || post.published)
        .filter(|post| query.is_empty() || matches_query(post, &query))
        .collect();

    match options.sort {
        SortDirection::NewestFirst => visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortDirection::OldestFirst => visible.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
    }
    visible
}

/// `needle` must already be lower-cased.
fn matches_query(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.content.to_lowercase().contains(needle)
        || post.tags.join(",").to_lowercase().contains(needle)
}
