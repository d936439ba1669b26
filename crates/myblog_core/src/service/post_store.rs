//! In-memory post collection mirrored to a key-value store.
//!
//! # Responsibility
//! - Own every `Post` record and apply create/update/toggle/delete.
//! - Re-persist the whole collection after each mutation.
//!
//! # Invariants
//! - Post ids are unique within the collection.
//! - Every mutation builds the next collection and swaps it in whole; callers
//!   never observe a partially applied change.
//! - Persistence is best-effort: read and write failures are logged and the
//!   in-memory collection stays authoritative.

use crate::model::post::{validate_title, Post, PostId, PostValidationError};
use crate::ports::clock::Clock;
use crate::repo::kv_store::KeyValueStore;
use crate::repo::post_repo::{load_posts, save_posts};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store error for post mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(PostValidationError),
    PostNotFound(PostId),
    /// Replacement collection contains the same id twice.
    DuplicateId(PostId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate post id: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PostValidationError> for StoreError {
    fn from(value: PostValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
}

/// Full replacement of a post's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Forces `published = true`; when false the flag is left unchanged.
    pub publish: bool,
}

/// Post collection bound to a persistence backend and a clock.
pub struct PostStore<S: KeyValueStore, C: Clock> {
    storage: S,
    clock: C,
    posts: Vec<Post>,
}

impl<S: KeyValueStore, C: Clock> PostStore<S, C> {
    /// Loads the stored collection once.
    ///
    /// Unreadable or undecodable storage yields an empty collection.
    pub fn open(storage: S, clock: C) -> Self {
        let posts = match load_posts(&storage) {
            Ok(posts) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    posts.len()
                );
                posts
            }
            Err(err) => {
                warn!("event=store_load module=store status=error error={err}");
                Vec::new()
            }
        };

        Self {
            storage,
            clock,
            posts,
        }
    }

    /// Posts in collection order (newest created first).
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates a post with a fresh id and prepends it.
    pub fn create(&mut self, input: NewPost) -> Result<Post, StoreError> {
        validate_title(&input.title)?;
        let post = Post::new(
            &input.title,
            input.content,
            input.tags,
            input.published,
            self.clock.now_ms(),
        );

        let mut next = Vec::with_capacity(self.posts.len() + 1);
        next.push(post.clone());
        next.extend(self.posts.iter().cloned());
        self.commit(next);

        info!(
            "event=post_create module=store status=ok post_id={} published={}",
            post.id, post.published
        );
        Ok(post)
    }

    /// Replaces title, content and tags and bumps `updated_at`.
    pub fn update_content(&mut self, id: &PostId, update: PostUpdate) -> Result<Post, StoreError> {
        validate_title(&update.title)?;
        let now = self.clock.now_ms();
        let title = update.title.trim().to_string();

        let updated = self.replace_one(id, |post| Post {
            title,
            content: update.content,
            tags: update.tags,
            updated_at: now,
            published: update.publish || post.published,
            ..post.clone()
        })?;

        info!(
            "event=post_update module=store status=ok post_id={} published={}",
            updated.id, updated.published
        );
        Ok(updated)
    }

    /// Flips `published` and bumps `updated_at`.
    pub fn toggle_publish(&mut self, id: &PostId) -> Result<Post, StoreError> {
        let now = self.clock.now_ms();
        let toggled = self.replace_one(id, |post| Post {
            published: !post.published,
            updated_at: now,
            ..post.clone()
        })?;

        info!(
            "event=post_toggle_publish module=store status=ok post_id={} published={}",
            toggled.id, toggled.published
        );
        Ok(toggled)
    }

    /// Removes a post and returns it.
    pub fn delete(&mut self, id: &PostId) -> Result<Post, StoreError> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;
        let next = self
            .posts
            .iter()
            .filter(|post| &post.id != id)
            .cloned()
            .collect();
        self.commit(next);

        info!("event=post_delete module=store status=ok post_id={id}");
        Ok(removed)
    }

    /// Swaps in an entirely new collection (import path).
    ///
    /// Every post must validate and ids must be unique; on error the current
    /// collection is left untouched.
    pub fn replace_all(&mut self, posts: Vec<Post>) -> Result<(), StoreError> {
        ensure_valid_collection(&posts)?;

        let count = posts.len();
        self.commit(posts);
        info!("event=store_replace module=store status=ok count={count}");
        Ok(())
    }

    fn replace_one<F>(&mut self, id: &PostId, change: F) -> Result<Post, StoreError>
    where
        F: FnOnce(&Post) -> Post,
    {
        let index = self
            .posts
            .iter()
            .position(|post| &post.id == id)
            .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;

        let replacement = change(&self.posts[index]);
        let mut next = self.posts.clone();
        next[index] = replacement.clone();
        self.commit(next);
        Ok(replacement)
    }

    fn commit(&mut self, next: Vec<Post>) {
        self.posts = next;
        if let Err(err) = save_posts(&mut self.storage, &self.posts) {
            warn!(
                "event=store_persist module=store status=error count={} error={err}",
                self.posts.len()
            );
        }
    }
}

fn ensure_valid_collection(posts: &[Post]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(posts.len());
    for post in posts {
        post.validate()?;
        if !seen.insert(&post.id) {
            return Err(StoreError::DuplicateId(post.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewPost, PostStore, PostUpdate, StoreError};
    use crate::model::post::{PostId, PostValidationError};
    use crate::ports::clock::FixedClock;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult};
    use crate::repo::post_repo::{load_posts, STORAGE_KEY};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> RepoResult<Option<String>> {
            Err(RepoError::Unavailable("read refused".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> RepoResult<()> {
            Err(RepoError::Unavailable("write refused".to_string()))
        }

        fn remove(&mut self, _key: &str) -> RepoResult<()> {
            Ok(())
        }
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "body".to_string(),
            tags: vec!["t".to_string()],
            published: false,
        }
    }

    #[test]
    fn create_prepends_and_persists() {
        let clock = FixedClock::new(100);
        let mut store = PostStore::open(MemoryKeyValueStore::new(), &clock);
        let first = store.create(new_post("first")).unwrap();
        let second = store.create(new_post("second")).unwrap();

        assert_eq!(store.posts()[0].id, second.id);
        assert_eq!(store.posts()[1].id, first.id);
        assert_eq!(load_posts(store.storage()).unwrap(), store.posts());
    }

    #[test]
    fn blank_title_is_rejected_without_mutation() {
        let clock = FixedClock::new(0);
        let mut store = PostStore::open(MemoryKeyValueStore::new(), &clock);
        let err = store.create(new_post("   ")).unwrap_err();
        assert_eq!(err, StoreError::Validation(PostValidationError::EmptyTitle));
        assert!(store.is_empty());
        assert!(store.storage().get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn update_keeps_published_unless_publishing() {
        let clock = FixedClock::new(10);
        let mut store = PostStore::open(MemoryKeyValueStore::new(), &clock);
        let mut input = new_post("p");
        input.published = true;
        let created = store.create(input).unwrap();

        clock.set(20);
        let updated = store
            .update_content(
                &created.id,
                PostUpdate {
                    title: " renamed ".to_string(),
                    content: "new".to_string(),
                    tags: vec![],
                    publish: false,
                },
            )
            .unwrap();
        assert!(updated.published);
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.created_at, 10);
        assert_eq!(updated.updated_at, 20);
    }

    #[test]
    fn toggle_flips_flag_and_bumps_timestamp() {
        let clock = FixedClock::new(1);
        let mut store = PostStore::open(MemoryKeyValueStore::new(), &clock);
        let created = store.create(new_post("p")).unwrap();
        clock.set(5);
        let toggled = store.toggle_publish(&created.id).unwrap();
        assert!(toggled.published);
        assert_eq!(toggled.updated_at, 5);
        assert!(!store.toggle_publish(&created.id).unwrap().published);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let clock = FixedClock::new(1);
        let mut store = PostStore::open(MemoryKeyValueStore::new(), &clock);
        let missing = PostId::from("missing");
        assert_eq!(
            store.delete(&missing).unwrap_err(),
            StoreError::PostNotFound(missing)
        );
    }

    #[test]
    fn replace_all_rejects_duplicate_ids_and_keeps_state() {
        let clock = FixedClock::new(1);
        let mut store = PostStore::open(MemoryKeyValueStore::new(), &clock);
        let kept = store.create(new_post("kept")).unwrap();
        let dup = store.posts()[0].clone();

        let err = store.replace_all(vec![dup.clone(), dup]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.posts()[0].id, kept.id);
    }

    #[test]
    fn storage_failures_are_contained() {
        let clock = FixedClock::new(1);
        let mut store = PostStore::open(BrokenStore, &clock);
        assert!(store.is_empty());
        let created = store.create(new_post("still works")).unwrap();
        assert_eq!(store.get(&created.id), Some(&created));
    }

    #[test]
    fn corrupt_storage_opens_empty() {
        let mut backing = MemoryKeyValueStore::new();
        backing.set(STORAGE_KEY, "not json").unwrap();
        let clock = FixedClock::new(1);
        let store = PostStore::open(backing, &clock);
        assert!(store.is_empty());
    }
}
