//! Editor session use-cases over the post store.
//!
//! # Responsibility
//! - Drive the editor draft through new/edit/save/delete flows.
//! - Hold the current view options and expose the display list.
//! - Bridge preview rendering and JSON import/export to the store.
//!
//! # Invariants
//! - A save with a blank title is rejected and leaves the draft untouched.
//! - A successful save always clears the draft.
//! - Deleting the post under edit clears the draft.
//! - A failed import leaves the collection untouched.
//! - An import that drops the post under edit clears the draft.

use crate::exchange::{export_posts, import_posts, read_import, write_export, ExchangeError};
use crate::model::post::{validate_title, Post, PostId};
use crate::ports::clock::Clock;
use crate::render::markdown::preview;
use crate::repo::kv_store::KeyValueStore;
use crate::service::editor::EditorDraft;
use crate::service::post_store::{NewPost, PostStore, PostUpdate, StoreError};
use crate::service::view::{visible_posts, ViewOptions};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Service error for editor use-cases.
#[derive(Debug)]
pub enum BlogError {
    /// Save attempted with an empty or whitespace-only title.
    EmptyTitle,
    Store(StoreError),
    Exchange(ExchangeError),
}

impl Display for BlogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Please add a title"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Exchange(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyTitle => None,
            Self::Store(err) => Some(err),
            Self::Exchange(err) => Some(err),
        }
    }
}

impl From<StoreError> for BlogError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ExchangeError> for BlogError {
    fn from(value: ExchangeError) -> Self {
        Self::Exchange(value)
    }
}

/// Editor session facade: store + draft + view options.
pub struct BlogService<S: KeyValueStore, C: Clock> {
    store: PostStore<S, C>,
    draft: EditorDraft,
    view: ViewOptions,
}

impl<S: KeyValueStore, C: Clock> BlogService<S, C> {
    /// Opens the store from `storage` with an empty draft and default view.
    pub fn open(storage: S, clock: C) -> Self {
        Self::new(PostStore::open(storage, clock))
    }

    pub fn new(store: PostStore<S, C>) -> Self {
        Self {
            store,
            draft: EditorDraft::default(),
            view: ViewOptions::default(),
        }
    }

    pub fn store(&self) -> &PostStore<S, C> {
        &self.store
    }

    pub fn posts(&self) -> &[Post] {
        self.store.posts()
    }

    pub fn draft(&self) -> &EditorDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EditorDraft {
        &mut self.draft
    }

    pub fn view(&self) -> &ViewOptions {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewOptions {
        &mut self.view
    }

    /// Discards the draft and starts a new post.
    pub fn start_new(&mut self) {
        self.draft.clear();
    }

    /// Loads a stored post into the draft.
    pub fn load_for_edit(&mut self, id: &PostId) -> Result<&EditorDraft, BlogError> {
        let post = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;
        self.draft = EditorDraft::from_post(post);
        Ok(&self.draft)
    }

    /// Saves the draft as a new post or over the post under edit.
    ///
    /// With `publish_now` the post is forced published and the
    /// "published only" view filter is switched off.
    pub fn save(&mut self, publish_now: bool) -> Result<Post, BlogError> {
        if validate_title(&self.draft.title).is_err() {
            return Err(BlogError::EmptyTitle);
        }

        let tags = self.draft.tags();
        let title = self.draft.title.trim().to_string();
        let content = self.draft.content.clone();

        let saved = match self.draft.editing_id.clone() {
            Some(id) => self.store.update_content(
                &id,
                PostUpdate {
                    title,
                    content,
                    tags,
                    publish: publish_now,
                },
            )?,
            None => self.store.create(NewPost {
                title,
                content,
                tags,
                published: publish_now,
            })?,
        };

        if publish_now {
            self.view.published_only = false;
        }
        self.draft.clear();
        Ok(saved)
    }

    pub fn toggle_publish(&mut self, id: &PostId) -> Result<Post, BlogError> {
        Ok(self.store.toggle_publish(id)?)
    }

    /// Deletes a post; clears the draft if it was being edited.
    pub fn delete(&mut self, id: &PostId) -> Result<Post, BlogError> {
        let removed = self.store.delete(id)?;
        if self.draft.is_editing(id) {
            self.draft.clear();
        }
        Ok(removed)
    }

    /// Posts to display under the current view options.
    pub fn visible_posts(&self) -> Vec<&Post> {
        visible_posts(self.store.posts(), &self.view)
    }

    /// Rendered draft content, `None` when blank.
    pub fn preview(&self) -> Option<String> {
        preview(&self.draft.content)
    }

    pub fn export_json(&self) -> Result<String, BlogError> {
        Ok(export_posts(self.store.posts())?)
    }

    /// Writes a dated export file into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, BlogError> {
        let now = self.store.clock().now_ms();
        Ok(write_export(dir, self.store.posts(), now)?)
    }

    /// Replaces the whole collection from an import payload.
    ///
    /// Returns the number of imported posts. On failure the error is logged
    /// and the collection is unchanged; callers are free to ignore it.
    pub fn import_json(&mut self, text: &str) -> Result<usize, BlogError> {
        self.apply_import(import_posts(text))
    }

    /// Same as [`BlogService::import_json`], reading the payload from `path`.
    pub fn import_file(&mut self, path: &Path) -> Result<usize, BlogError> {
        self.apply_import(read_import(path))
    }

    fn apply_import(
        &mut self,
        decoded: Result<Vec<Post>, ExchangeError>,
    ) -> Result<usize, BlogError> {
        let result = decoded.map_err(BlogError::from).and_then(|posts| {
            let count = posts.len();
            self.store.replace_all(posts)?;
            Ok(count)
        });

        match &result {
            Ok(count) => {
                let orphaned = self
                    .draft
                    .editing_id
                    .as_ref()
                    .is_some_and(|id| self.store.get(id).is_none());
                if orphaned {
                    self.draft.clear();
                }
                info!(
                    "event=post_import module=service status=ok count={count} draft_cleared={orphaned}"
                );
            }
            Err(err) => warn!("event=post_import module=service status=ignored error={err}"),
        }
        result
    }
}
