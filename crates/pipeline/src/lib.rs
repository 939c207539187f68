//! Batch write stage of the log migration.
//!
//! [`writer::LogWriter`] takes one batch of [`SourceLogRecord`]s and writes
//! it in a single transaction: plain logs through one bulk insert, logs with
//! a binary attachment one by one through the blob store, the `attachment`
//! table and the `log` table.
//!
//! [`SourceLogRecord`]: logmig_core::source::SourceLogRecord

pub mod attachment_sink;
pub mod config;
pub mod error;
pub mod log_sink;
pub mod telemetry;
pub mod writer;

pub use error::WriteError;
pub use writer::{LogWriter, WriteSummary};
