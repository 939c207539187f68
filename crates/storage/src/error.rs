use std::path::PathBuf;

/// Errors raised by a [`BlobStore`](crate::BlobStore).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The logical path is empty, absolute, or escapes the store root.
    #[error("Invalid storage path '{0}'")]
    InvalidPath(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload could not be decoded or re-encoded as an image.
    #[error("Thumbnail derivation failed: {0}")]
    Thumbnail(#[from] image::ImageError),

    #[error("Thumbnail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
