//! Repository for the `attachment` table.

use logmig_core::types::DbId;
use sqlx::PgConnection;

use crate::models::attachment::{Attachment, CreateAttachment};

const COLUMNS: &str = "id, file_id, thumbnail_id, content_type, project_id, launch_id, item_id";

pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Insert an attachment row, returning its generated id.
    ///
    /// `ON CONFLICT DO NOTHING` keeps the statement shape of the log inserts;
    /// if a conflict ever suppressed the row no id comes back and the call
    /// fails with `RowNotFound`.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateAttachment,
    ) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO attachment (file_id, thumbnail_id, content_type, project_id, launch_id, item_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT DO NOTHING
             RETURNING id",
        )
        .bind(&input.file_id)
        .bind(&input.thumbnail_id)
        .bind(&input.content_type)
        .bind(input.project_id)
        .bind(input.launch_id)
        .bind(input.item_id)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    /// Find an attachment by its id.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachment WHERE id = $1");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List attachments belonging to a test item, oldest first.
    pub async fn list_by_item(
        conn: &mut PgConnection,
        item_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachment WHERE item_id = $1 ORDER BY id");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(item_id)
            .fetch_all(conn)
            .await
    }
}
