//! JSON encoding of the post collection under the fixed storage key.
//!
//! # Invariants
//! - A missing key decodes to an empty collection.
//! - The stored value is always a JSON array of posts.

use crate::model::post::Post;
use crate::repo::kv_store::{KeyValueStore, RepoResult};

/// Storage key holding the serialized post array.
pub const STORAGE_KEY: &str = "myblog_posts_v1";

/// Reads and decodes the whole collection.
pub fn load_posts<S: KeyValueStore + ?Sized>(store: &S) -> RepoResult<Vec<Post>> {
    match store.get(STORAGE_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Encodes and writes the whole collection, replacing what was stored.
pub fn save_posts<S: KeyValueStore + ?Sized>(store: &mut S, posts: &[Post]) -> RepoResult<()> {
    let encoded = serde_json::to_string(posts)?;
    store.set(STORAGE_KEY, &encoded)
}
