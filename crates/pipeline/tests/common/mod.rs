use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::DateTime;
use logmig_core::path::PathGenerator;
use logmig_core::source::{AttachmentPayload, BinaryAttachment, SourceLogLevel, SourceLogRecord};
use logmig_pipeline::LogWriter;
use logmig_storage::{BlobStore, StorageError};
use sqlx::PgPool;

pub const PROJECT_ID: i64 = 5;
pub const LAUNCH_ID: i64 = 6;
pub const ITEM_ID: i64 = 7;

/// One call made against [`RecordingBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    Save(String),
    Thumbnail(String),
}

/// In-memory blob store that records every call and returns the logical
/// path as stored identifier.
#[derive(Default)]
pub struct RecordingBlobStore {
    calls: Mutex<Vec<BlobCall>>,
    fail_thumbnails: bool,
}

impl RecordingBlobStore {
    /// A store whose `save_thumbnail` always fails.
    pub fn failing_thumbnails() -> Self {
        Self {
            fail_thumbnails: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<BlobCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saves(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BlobCall::Save(path) => Some(path),
                BlobCall::Thumbnail(_) => None,
            })
            .collect()
    }

    pub fn thumbnails(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BlobCall::Thumbnail(path) => Some(path),
                BlobCall::Save(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn save(&self, path: &str, _data: &[u8]) -> Result<String, StorageError> {
        self.calls.lock().unwrap().push(BlobCall::Save(path.to_string()));
        Ok(path.to_string())
    }

    async fn save_thumbnail(&self, path: &str, _data: &[u8]) -> Result<String, StorageError> {
        self.calls
            .lock()
            .unwrap()
            .push(BlobCall::Thumbnail(path.to_string()));
        if self.fail_thumbnails {
            return Err(StorageError::Io {
                path: path.into(),
                source: std::io::Error::other("thumbnail volume full"),
            });
        }
        Ok(path.to_string())
    }
}

/// Path generator yielding `token-1`, `token-2`, ...
#[derive(Default)]
pub struct SequencePathGenerator(AtomicUsize);

impl PathGenerator for SequencePathGenerator {
    fn generate(&self) -> String {
        format!("token-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

pub fn writer(pool: PgPool, store: Arc<RecordingBlobStore>) -> LogWriter {
    LogWriter::new(pool, store, Arc::new(SequencePathGenerator::default()))
}

pub fn plain(id: &str, message: &str) -> SourceLogRecord {
    SourceLogRecord {
        id: id.to_string(),
        log_time: Some(DateTime::parse_from_rfc3339("2018-05-01T10:00:00+03:00").unwrap()),
        last_modified: Some(DateTime::parse_from_rfc3339("2018-05-01T10:00:05+03:00").unwrap()),
        message: message.to_string(),
        item_id: ITEM_ID,
        level: None,
        attachment: None,
    }
}

pub fn with_level(mut record: SourceLogRecord, code: i32) -> SourceLogRecord {
    record.level = Some(SourceLogLevel { code });
    record
}

pub fn with_file(id: &str, filename: &str, content_type: &str) -> SourceLogRecord {
    SourceLogRecord {
        attachment: Some(BinaryAttachment {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            payload: AttachmentPayload::Inline(b"binary payload".to_vec()),
            project_id: PROJECT_ID,
            launch_id: LAUNCH_ID,
        }),
        ..plain(id, "attachment log")
    }
}
