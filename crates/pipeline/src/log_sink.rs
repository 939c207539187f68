//! Mapping of source records to `log` rows and their inserts.

use logmig_core::error::MappingError;
use logmig_core::source::SourceLogRecord;
use logmig_core::time::to_utc;
use logmig_core::types::DbId;
use logmig_db::models::log::CreateLog;
use logmig_db::repositories::LogRepo;
use sqlx::PgConnection;

use crate::error::WriteError;

/// Map a source record to the `log` row shape, without an attachment.
pub fn to_row(record: &SourceLogRecord) -> Result<CreateLog, MappingError> {
    let missing = |field| MappingError::MissingField {
        uuid: record.id.clone(),
        field,
    };

    if record.id.trim().is_empty() {
        return Err(missing("id"));
    }

    Ok(CreateLog {
        uuid: record.id.clone(),
        log_time: to_utc(record.log_time).ok_or_else(|| missing("log_time"))?,
        log_message: record.message.clone(),
        item_id: record.item_id,
        last_modified: to_utc(record.last_modified).ok_or_else(|| missing("last_modified"))?,
        log_level: record.level_code(),
        attachment_id: None,
    })
}

/// Map and bulk-insert attachment-free records, skipping duplicate uuids.
///
/// Returns the number of rows actually inserted.
pub async fn insert_plain(
    conn: &mut PgConnection,
    records: &[&SourceLogRecord],
) -> Result<u64, WriteError> {
    let rows = records
        .iter()
        .map(|record| to_row(record))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LogRepo::insert_batch(conn, &rows).await?)
}

/// Map and insert one record linked to `attachment_id`, skipping a duplicate uuid.
///
/// Returns `true` if the row was inserted.
pub async fn insert_with_attachment(
    conn: &mut PgConnection,
    record: &SourceLogRecord,
    attachment_id: DbId,
) -> Result<bool, WriteError> {
    let row = CreateLog {
        attachment_id: Some(attachment_id),
        ..to_row(record)?
    };
    Ok(LogRepo::insert_one(conn, &row).await?)
}
