//! Persistence port and its implementations.
//!
//! # Responsibility
//! - Define the key-value contract the post store writes through.
//! - Keep SQLite and JSON encoding details out of the service layer.
//!
//! # Invariants
//! - The whole post collection lives under one fixed key.
//! - Writes always replace the full value; there are no partial updates.

pub mod kv_store;
pub mod post_repo;
