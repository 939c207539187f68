//! Domain types and pure helpers for the log migration write stage.
//!
//! Nothing in this crate talks to the database or the blob store. The only
//! I/O is reading an attachment payload that the source reader spooled to
//! disk.

pub mod content_type;
pub mod error;
pub mod path;
pub mod source;
pub mod time;
pub mod types;
