//! Repository for the `log` table.

use logmig_core::types::DbId;
use sqlx::PgConnection;

use crate::models::log::{CreateLog, Log};

const COLUMNS: &str = "id, uuid, log_time, log_message, item_id, last_modified, log_level, \
    attachment_id";

/// Bind parameters per row in [`LogRepo::insert_batch`].
const PARAMS_PER_ROW: usize = 6;

/// Rows per multi-row INSERT, keeping each statement below PostgreSQL's
/// 65535 bind parameter limit.
pub const MAX_ROWS_PER_INSERT: usize = 10_000;

pub struct LogRepo;

impl LogRepo {
    /// Insert log rows without attachments.
    ///
    /// Uses a multi-row INSERT with `ON CONFLICT DO NOTHING`, so a `uuid`
    /// that already exists (in the table or earlier in `logs`) is skipped.
    /// `attachment_id` of the inputs is ignored and stored as NULL.
    /// Returns the number of rows actually inserted.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        logs: &[CreateLog],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for chunk in logs.chunks(MAX_ROWS_PER_INSERT) {
            let query = batch_insert_query(chunk.len());
            let mut q = sqlx::query(&query);
            for log in chunk {
                q = q
                    .bind(&log.uuid)
                    .bind(log.log_time)
                    .bind(&log.log_message)
                    .bind(log.item_id)
                    .bind(log.last_modified)
                    .bind(log.log_level);
            }
            inserted += q.execute(&mut *conn).await?.rows_affected();
        }
        Ok(inserted)
    }

    /// Insert a single log row, including its `attachment_id`.
    ///
    /// Skips on a duplicate `uuid`. Returns `true` if the row was inserted.
    pub async fn insert_one(conn: &mut PgConnection, log: &CreateLog) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO log (uuid, log_time, log_message, item_id, last_modified, log_level, attachment_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT DO NOTHING",
        )
        .bind(&log.uuid)
        .bind(log.log_time)
        .bind(&log.log_message)
        .bind(log.item_id)
        .bind(log.last_modified)
        .bind(log.log_level)
        .bind(log.attachment_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a log row with `uuid` exists (or was inserted earlier in the
    /// same transaction).
    pub async fn exists(conn: &mut PgConnection, uuid: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM log WHERE uuid = $1)")
            .bind(uuid)
            .fetch_one(conn)
            .await?;
        Ok(exists)
    }

    /// Find a log row by its migrated uuid.
    pub async fn find_by_uuid(conn: &mut PgConnection, uuid: &str) -> Result<Option<Log>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM log WHERE uuid = $1");
        sqlx::query_as::<_, Log>(&query)
            .bind(uuid)
            .fetch_optional(conn)
            .await
    }

    /// List log rows of a test item, ordered by log time.
    pub async fn list_by_item(conn: &mut PgConnection, item_id: DbId) -> Result<Vec<Log>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM log
             WHERE item_id = $1
             ORDER BY log_time ASC, id ASC"
        );
        sqlx::query_as::<_, Log>(&query)
            .bind(item_id)
            .fetch_all(conn)
            .await
    }

    /// Count all log rows.
    pub async fn count(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM log")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}

/// Build `INSERT INTO log (...) VALUES ($1, ..., $6), ($7, ...) ON CONFLICT DO NOTHING`
/// for `rows` rows.
fn batch_insert_query(rows: usize) -> String {
    let mut query = String::from(
        "INSERT INTO log (uuid, log_time, log_message, item_id, last_modified, log_level) VALUES ",
    );
    for row in 0..rows {
        if row > 0 {
            query.push_str(", ");
        }
        let first = row * PARAMS_PER_ROW + 1;
        let placeholders: Vec<String> = (first..first + PARAMS_PER_ROW)
            .map(|idx| format!("${idx}"))
            .collect();
        query.push('(');
        query.push_str(&placeholders.join(", "));
        query.push(')');
    }
    query.push_str(" ON CONFLICT DO NOTHING");
    query
}
