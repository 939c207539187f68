//! Blob storage for migrated attachment payloads and their thumbnails.

use async_trait::async_trait;

pub mod error;
pub mod filesystem;
pub mod thumbnail;

pub use error::StorageError;
pub use filesystem::FilesystemBlobStore;
pub use thumbnail::ThumbnailSize;

/// Storage backend for attachment payloads.
///
/// Paths are logical `/`-separated keys; the returned string is the stored
/// identifier that goes into `attachment.file_id` / `attachment.thumbnail_id`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `path`.
    async fn save(&self, path: &str, data: &[u8]) -> Result<String, StorageError>;

    /// Derive a thumbnail from the image in `data` and store it under `path`.
    async fn save_thumbnail(&self, path: &str, data: &[u8]) -> Result<String, StorageError>;
}
