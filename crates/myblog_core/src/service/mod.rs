//! Core use-case services.
//!
//! # Responsibility
//! - Own the post collection and its mutations (`post_store`).
//! - Derive the display list (`view`) and drive the editor (`blog_service`).
//! - Keep front-ends decoupled from storage and encoding details.

pub mod blog_service;
pub mod editor;
pub mod post_store;
pub mod view;
