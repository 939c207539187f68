//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&mut PgConnection` as the first argument, so the same call works
//! on a pooled connection or inside a transaction (`&mut *tx`).

pub mod attachment_repo;
pub mod log_repo;

pub use attachment_repo::AttachmentRepo;
pub use log_repo::LogRepo;
