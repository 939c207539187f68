//! Persistence of binary attachments: blob, optional thumbnail, `attachment` row.

use std::sync::Arc;

use logmig_core::content_type::{is_image, join_path, thumbnail_file_name};
use logmig_core::error::MappingError;
use logmig_core::path::PathGenerator;
use logmig_core::source::{BinaryAttachment, SourceLogRecord};
use logmig_core::types::DbId;
use logmig_db::models::attachment::CreateAttachment;
use logmig_db::repositories::AttachmentRepo;
use logmig_storage::{BlobStore, StorageError};
use sqlx::PgConnection;

use crate::error::WriteError;

/// Identifiers returned by the blob store for one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlobs {
    pub file_id: String,
    pub thumbnail_id: Option<String>,
}

/// Writes attachment payloads to the blob store and records them in the
/// `attachment` table.
#[derive(Clone)]
pub struct AttachmentSink {
    blob_store: Arc<dyn BlobStore>,
    path_generator: Arc<dyn PathGenerator>,
}

impl AttachmentSink {
    pub fn new(blob_store: Arc<dyn BlobStore>, path_generator: Arc<dyn PathGenerator>) -> Self {
        Self {
            blob_store,
            path_generator,
        }
    }

    /// Store the payload of `attachment` and, for images only, its thumbnail.
    ///
    /// Both land under `storage_path`. A thumbnail failure fails the whole
    /// call; the original blob stays written.
    pub async fn store_blobs(
        &self,
        attachment: &BinaryAttachment,
        data: &[u8],
        storage_path: &str,
    ) -> Result<StoredBlobs, StorageError> {
        let target_path = join_path(storage_path, &attachment.filename);
        let file_id = self.blob_store.save(&target_path, data).await?;

        let thumbnail_id = if is_image(&attachment.content_type) {
            let thumbnail_path = thumbnail_file_name(storage_path, &attachment.filename);
            Some(self.blob_store.save_thumbnail(&thumbnail_path, data).await?)
        } else {
            None
        };

        Ok(StoredBlobs {
            file_id,
            thumbnail_id,
        })
    }

    /// Read the payload, store its blobs and insert the `attachment` row.
    ///
    /// Returns the generated attachment id. An attachment without a
    /// filename is rejected before anything is stored, since its blob would
    /// land on the storage directory itself.
    pub async fn persist(
        &self,
        conn: &mut PgConnection,
        record: &SourceLogRecord,
        attachment: &BinaryAttachment,
    ) -> Result<DbId, WriteError> {
        if attachment.filename.trim().is_empty() {
            return Err(MappingError::MissingField {
                uuid: record.id.clone(),
                field: "filename",
            }
            .into());
        }

        let data = attachment
            .payload
            .read_all()
            .await
            .map_err(|source| WriteError::Payload {
                uuid: record.id.clone(),
                source,
            })?;

        let storage_path = join_path(
            &attachment.project_id.to_string(),
            &self.path_generator.generate(),
        );
        let blobs = self.store_blobs(attachment, &data, &storage_path).await?;

        tracing::debug!(
            uuid = %record.id,
            file_id = %blobs.file_id,
            thumbnail_id = ?blobs.thumbnail_id,
            size = data.len(),
            "Attachment blobs stored"
        );

        let input = CreateAttachment {
            file_id: blobs.file_id,
            thumbnail_id: blobs.thumbnail_id,
            content_type: attachment.content_type.clone(),
            project_id: attachment.project_id,
            launch_id: attachment.launch_id,
            item_id: record.item_id,
        };
        Ok(AttachmentRepo::create(conn, &input).await?)
    }
}
