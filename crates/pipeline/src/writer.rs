//! Batch write coordinator.
//!
//! One call to [`LogWriter::write`] is one transaction. Within it, plain
//! logs go in first through a single bulk insert, then every log with an
//! attachment is handled in source order: blob, thumbnail (images only),
//! `attachment` row, `log` row.
//!
//! If the transaction fails because the database rejected a NUL character,
//! null bytes are stripped from every message of the batch and the whole
//! batch is written once more in a fresh transaction. Inserts skip duplicate
//! uuids, so rows the first attempt would have written are not duplicated.
//! Any other failure, or a second failure, is returned to the caller.
//!
//! An attachment record whose uuid is already in `log` is skipped before
//! its blobs are written.

use std::sync::Arc;

use logmig_core::path::{PathGenerator, UuidPathGenerator};
use logmig_core::source::{BinaryAttachment, SourceLogRecord};
use logmig_db::repositories::LogRepo;
use logmig_storage::{BlobStore, FilesystemBlobStore};
use serde::Serialize;
use sqlx::PgPool;

use crate::attachment_sink::AttachmentSink;
use crate::config::WriterConfig;
use crate::error::{BootstrapError, WriteError};
use crate::log_sink;

/// Sanitize-and-retry cycles allowed per batch.
const MAX_NULL_BYTE_RETRIES: u32 = 1;

/// Rows written by one successful [`LogWriter::write`] call.
///
/// The `*_inserted` counts exclude records skipped as duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub plain_inserted: u64,
    pub attachments_inserted: u64,
    pub attachment_logs_inserted: u64,
    /// Records whose uuid was already present.
    pub duplicates_skipped: u64,
    /// Whether the batch only went through after stripping null bytes.
    pub retried: bool,
}

/// First/last uuid and size of a batch, for log context.
#[derive(Debug)]
struct BatchBoundary<'a> {
    size: usize,
    first_uuid: &'a str,
    last_uuid: &'a str,
}

impl<'a> BatchBoundary<'a> {
    fn of(batch: &'a [SourceLogRecord]) -> Self {
        Self {
            size: batch.len(),
            first_uuid: batch.first().map_or("", |r| r.id.as_str()),
            last_uuid: batch.last().map_or("", |r| r.id.as_str()),
        }
    }
}

/// Writes batches of source log records into the `log` / `attachment`
/// tables and the blob store.
#[derive(Clone)]
pub struct LogWriter {
    pool: PgPool,
    attachments: AttachmentSink,
}

impl LogWriter {
    pub fn new(
        pool: PgPool,
        blob_store: Arc<dyn BlobStore>,
        path_generator: Arc<dyn PathGenerator>,
    ) -> Self {
        Self {
            pool,
            attachments: AttachmentSink::new(blob_store, path_generator),
        }
    }

    /// Connect, verify and migrate the database, then build a writer backed
    /// by the filesystem blob store.
    pub async fn from_config(config: &WriterConfig) -> Result<Self, BootstrapError> {
        let pool = logmig_db::create_pool(&config.database_url, config.max_connections).await?;
        logmig_db::health_check(&pool).await?;
        logmig_db::run_migrations(&pool).await?;
        tracing::info!(
            max_connections = config.max_connections,
            blob_store_root = %config.blob_store_root.display(),
            "Log writer ready"
        );

        let blob_store = FilesystemBlobStore::new(&config.blob_store_root, config.thumbnail_size);
        Ok(Self::new(pool, Arc::new(blob_store), Arc::new(UuidPathGenerator)))
    }

    /// Write one batch atomically.
    ///
    /// On a null-byte violation the batch is sanitized and written once
    /// more; every other error is returned as is.
    pub async fn write(&self, mut batch: Vec<SourceLogRecord>) -> Result<WriteSummary, WriteError> {
        if batch.is_empty() {
            return Ok(WriteSummary::default());
        }

        let mut retries = 0;
        loop {
            match self.write_once(&batch).await {
                Ok(mut summary) => {
                    summary.retried = retries > 0;
                    let boundary = BatchBoundary::of(&batch);
                    tracing::debug!(
                        batch_size = boundary.size,
                        first_uuid = boundary.first_uuid,
                        last_uuid = boundary.last_uuid,
                        plain_inserted = summary.plain_inserted,
                        attachments_inserted = summary.attachments_inserted,
                        attachment_logs_inserted = summary.attachment_logs_inserted,
                        duplicates_skipped = summary.duplicates_skipped,
                        retried = summary.retried,
                        "Log batch written"
                    );
                    return Ok(summary);
                }
                Err(err) if retries < MAX_NULL_BYTE_RETRIES && err.is_null_byte_violation() => {
                    retries += 1;
                    let sanitized = batch
                        .iter_mut()
                        .map(SourceLogRecord::strip_null_bytes)
                        .filter(|changed| *changed)
                        .count();
                    let boundary = BatchBoundary::of(&batch);
                    tracing::warn!(
                        batch_size = boundary.size,
                        first_uuid = boundary.first_uuid,
                        last_uuid = boundary.last_uuid,
                        sanitized,
                        error = %err,
                        "Null byte rejected by database, retrying batch without null bytes"
                    );
                }
                Err(err) => {
                    let boundary = BatchBoundary::of(&batch);
                    tracing::error!(
                        batch_size = boundary.size,
                        first_uuid = boundary.first_uuid,
                        last_uuid = boundary.last_uuid,
                        error_class = err.class(),
                        retried = retries > 0,
                        error = %err,
                        "Log batch write failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// One transactional attempt at writing `batch`.
    ///
    /// Returning early drops `tx`, which rolls it back.
    async fn write_once(&self, batch: &[SourceLogRecord]) -> Result<WriteSummary, WriteError> {
        let (plain, with_attachment) = split(batch);
        let mut summary = WriteSummary::default();

        let mut tx = self.pool.begin().await?;

        summary.plain_inserted = log_sink::insert_plain(&mut *tx, &plain).await?;
        summary.duplicates_skipped = plain.len() as u64 - summary.plain_inserted;

        for (record, attachment) in with_attachment {
            // Already migrated; skip before any blob is written.
            if LogRepo::exists(&mut *tx, &record.id).await? {
                summary.duplicates_skipped += 1;
                continue;
            }

            let attachment_id = self
                .attachments
                .persist(&mut *tx, record, attachment)
                .await?;
            summary.attachments_inserted += 1;

            if log_sink::insert_with_attachment(&mut *tx, record, attachment_id).await? {
                summary.attachment_logs_inserted += 1;
            } else {
                summary.duplicates_skipped += 1;
            }
        }

        tx.commit().await?;
        Ok(summary)
    }
}

/// Partition a batch into plain records and records with an attachment,
/// keeping source order within each side.
fn split(
    batch: &[SourceLogRecord],
) -> (
    Vec<&SourceLogRecord>,
    Vec<(&SourceLogRecord, &BinaryAttachment)>,
) {
    let mut plain = Vec::new();
    let mut with_attachment = Vec::new();
    for record in batch {
        match &record.attachment {
            Some(attachment) => with_attachment.push((record, attachment)),
            None => plain.push(record),
        }
    }
    (plain, with_attachment)
}
