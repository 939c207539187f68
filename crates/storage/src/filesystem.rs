//! Filesystem blob store.
//!
//! Blobs live under a root directory at their logical path. Writes go to a
//! sibling temp file first and are renamed into place, so a crashed write
//! never leaves a truncated blob at the final path.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;
use crate::thumbnail::{derive_thumbnail, ThumbnailSize};
use crate::BlobStore;

/// Stores blobs as plain files below `root`.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStore {
    root: PathBuf,
    thumbnail_size: ThumbnailSize,
}

impl FilesystemBlobStore {
    pub fn new(root: impl Into<PathBuf>, thumbnail_size: ThumbnailSize) -> Self {
        Self {
            root: root.into(),
            thumbnail_size,
        }
    }

    /// Resolve a logical path below the root, rejecting anything that is
    /// empty, absolute or climbs out with `..`.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let valid = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !valid {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    async fn write_atomic(&self, path: &str, data: &[u8]) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        tracing::debug!(storage_path = %path, size = data.len(), "blob store: write");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = temp_path_for(&full_path);
        let io_err = |source| StorageError::Io {
            path: temp_path.clone(),
            source,
        };
        let mut file = fs::File::create(&temp_path).await.map_err(io_err)?;
        file.write_all(data).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|source| {
            tracing::warn!(
                from = %temp_path.display(),
                to = %full_path.display(),
                error = %source,
                "blob store: rename failed"
            );
            StorageError::Io {
                path: full_path.clone(),
                source,
            }
        })?;

        Ok(path.to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn save(&self, path: &str, data: &[u8]) -> Result<String, StorageError> {
        self.write_atomic(path, data).await
    }

    async fn save_thumbnail(&self, path: &str, data: &[u8]) -> Result<String, StorageError> {
        // Decoding and scaling are CPU-bound.
        let data = data.to_vec();
        let size = self.thumbnail_size;
        let thumbnail =
            tokio::task::spawn_blocking(move || derive_thumbnail(&data, size)).await??;
        self.write_atomic(path, &thumbnail).await
    }
}

/// `dir/name.ext` -> `dir/name.ext.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
