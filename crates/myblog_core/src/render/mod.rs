//! Text rendering for post previews and listings.
//!
//! # Responsibility
//! - Turn untrusted post text into sanitized, styled markup.
//! - Format timestamps and export file names for display.
//!
//! # Invariants
//! - Rendering is pure: no I/O, no global state beyond compiled regexes.
//! - Input markup is never trusted; every `<...>` sequence is stripped.

pub mod markdown;
pub mod text;

pub use markdown::{preview, render_markdown, render_markdown_with, sanitize, MarkupTheme};
pub use text::{export_file_name, format_date};
