//! Blog domain model.
//!
//! # Responsibility
//! - Define the canonical `Post` record shared by store, view and exchange.
//!
//! # Invariants
//! - Every post is identified by a `PostId` unique within one collection.
//! - A persisted post always has a trimmed, non-empty title.

pub mod post;
