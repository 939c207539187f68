//! Attachment model.

use logmig_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attachment` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Attachment {
    pub id: DbId,
    pub file_id: String,
    pub thumbnail_id: Option<String>,
    pub content_type: Option<String>,
    pub project_id: Option<DbId>,
    pub launch_id: Option<DbId>,
    pub item_id: Option<DbId>,
}

/// Insert shape for an `attachment` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAttachment {
    pub file_id: String,
    pub thumbnail_id: Option<String>,
    pub content_type: String,
    pub project_id: DbId,
    pub launch_id: DbId,
    pub item_id: DbId,
}
