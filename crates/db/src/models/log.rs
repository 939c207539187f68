//! Log model.

use logmig_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `log` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Log {
    pub id: DbId,
    pub uuid: String,
    pub log_time: Timestamp,
    pub log_message: String,
    pub item_id: Option<DbId>,
    pub last_modified: Timestamp,
    pub log_level: i32,
    pub attachment_id: Option<DbId>,
}

/// Insert shape for a `log` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLog {
    pub uuid: String,
    pub log_time: Timestamp,
    pub log_message: String,
    pub item_id: DbId,
    pub last_modified: Timestamp,
    pub log_level: i32,
    pub attachment_id: Option<DbId>,
}
