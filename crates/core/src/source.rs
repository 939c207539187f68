//! Typed view of a log document read from the legacy store.
//!
//! The legacy documents are schema-less; the source reader is responsible
//! for turning each one into a [`SourceLogRecord`] where every optional
//! field is an explicit `Option`.

use std::borrow::Cow;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{DbId, SourceTimestamp};

/// Level code written when the legacy document carries no level object.
pub const DEFAULT_LOG_LEVEL: i32 = 30_000;

/// Character the target text encoding rejects inside `log_message`.
pub const NULL_BYTE: char = '\u{0}';

/// A log document as handed over by the source reader.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceLogRecord {
    /// Opaque unique token of the legacy document (stored as `log.uuid`).
    pub id: String,
    pub log_time: Option<SourceTimestamp>,
    pub last_modified: Option<SourceTimestamp>,
    pub message: String,
    pub item_id: DbId,
    #[serde(default)]
    pub level: Option<SourceLogLevel>,
    #[serde(default)]
    pub attachment: Option<BinaryAttachment>,
}

/// The level sub-object of a legacy log document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SourceLogLevel {
    pub code: i32,
}

/// Binary file linked to a legacy log document.
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryAttachment {
    pub filename: String,
    pub content_type: String,
    pub payload: AttachmentPayload,
    pub project_id: DbId,
    pub launch_id: DbId,
}

/// Where the attachment bytes currently live.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentPayload {
    /// Bytes already held in memory.
    Inline(Vec<u8>),
    /// Bytes spooled to a local file by the source reader.
    Spooled(PathBuf),
}

impl AttachmentPayload {
    /// Bytes of the payload. Inline payloads are borrowed, spooled ones
    /// are read into memory.
    pub async fn read_all(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            Self::Inline(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            Self::Spooled(path) => tokio::fs::read(path).await.map(Cow::Owned),
        }
    }
}

impl SourceLogRecord {
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// Numeric level code, falling back to [`DEFAULT_LOG_LEVEL`].
    pub fn level_code(&self) -> i32 {
        self.level.map_or(DEFAULT_LOG_LEVEL, |level| level.code)
    }

    /// Strip every null byte from the message.
    ///
    /// Returns `true` if the message was changed.
    pub fn strip_null_bytes(&mut self) -> bool {
        if !self.message.contains(NULL_BYTE) {
            return false;
        }
        self.message.retain(|c| c != NULL_BYTE);
        true
    }
}
