//! Core domain logic for myblog.
//! Posts, the post store, rendering and the view pipeline live here; the
//! CLI only parses arguments and prints.

pub mod db;
pub mod exchange;
pub mod logging;
pub mod model;
pub mod ports;
pub mod render;
pub mod repo;
pub mod service;

pub use exchange::{export_posts, import_posts, read_import, write_export, ExchangeError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::post::{Post, PostId, PostValidationError};
pub use ports::clock::{Clock, FixedClock, SystemClock};
pub use render::{export_file_name, format_date, preview, render_markdown, sanitize};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use repo::post_repo::STORAGE_KEY;
pub use service::blog_service::{BlogError, BlogService};
pub use service::editor::{format_tags, parse_tags, EditorDraft};
pub use service::post_store::{NewPost, PostStore, PostUpdate, StoreError};
pub use service::view::{visible_posts, SortDirection, ViewOptions};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
