//! Integration tests for the `log` and `attachment` repositories.
//!
//! Exercises the repository layer against a real database:
//! - Skip-on-conflict inserts (within one statement and across calls)
//! - Generated attachment ids and the log -> attachment reference
//! - Rejection of NUL characters by the server and its classification

use chrono::{TimeZone, Utc};
use logmig_db::errors::is_null_byte_violation;
use logmig_db::models::attachment::CreateAttachment;
use logmig_db::models::log::CreateLog;
use logmig_db::repositories::{AttachmentRepo, LogRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_log(uuid: &str, message: &str) -> CreateLog {
    CreateLog {
        uuid: uuid.to_string(),
        log_time: Utc.with_ymd_and_hms(2018, 5, 1, 7, 0, 0).unwrap(),
        log_message: message.to_string(),
        item_id: 1,
        last_modified: Utc.with_ymd_and_hms(2018, 5, 1, 7, 0, 1).unwrap(),
        log_level: 30_000,
        attachment_id: None,
    }
}

fn new_attachment(file_id: &str, thumbnail_id: Option<&str>) -> CreateAttachment {
    CreateAttachment {
        file_id: file_id.to_string(),
        thumbnail_id: thumbnail_id.map(str::to_string),
        content_type: "image/png".to_string(),
        project_id: 3,
        launch_id: 4,
        item_id: 1,
    }
}

// ---------------------------------------------------------------------------
// Log inserts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn batch_insert_stores_every_row(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let logs = vec![new_log("a", "one"), new_log("b", "two"), new_log("c", "three")];

    let inserted = LogRepo::insert_batch(&mut conn, &logs).await.unwrap();
    assert_eq!(inserted, 3);

    let stored = LogRepo::find_by_uuid(&mut conn, "b").await.unwrap().unwrap();
    assert_eq!(stored.log_message, "two");
    assert_eq!(stored.log_level, 30_000);
    assert_eq!(stored.item_id, Some(1));
    assert_eq!(stored.log_time, logs[1].log_time);
    assert!(stored.attachment_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn batch_insert_skips_duplicates_in_same_statement(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let logs = vec![new_log("dup", "first"), new_log("dup", "second")];

    let inserted = LogRepo::insert_batch(&mut conn, &logs).await.unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(LogRepo::count(&mut conn).await.unwrap(), 1);

    let stored = LogRepo::find_by_uuid(&mut conn, "dup").await.unwrap().unwrap();
    assert_eq!(stored.log_message, "first");
}

#[sqlx::test(migrations = "./migrations")]
async fn batch_insert_skips_rows_already_present(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    LogRepo::insert_batch(&mut conn, &[new_log("a", "one")]).await.unwrap();

    let inserted = LogRepo::insert_batch(&mut conn, &[new_log("a", "one"), new_log("b", "two")])
        .await
        .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(LogRepo::count(&mut conn).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn batch_insert_of_nothing_is_a_no_op(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(LogRepo::insert_batch(&mut conn, &[]).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn null_byte_in_message_is_rejected_and_classified(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let err = LogRepo::insert_batch(&mut conn, &[new_log("nul", "bad\u{0}message")])
        .await
        .unwrap_err();
    assert!(is_null_byte_violation(&err), "unexpected error: {err}");
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn attachment_id_is_generated_and_referenced(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let attachment_id = AttachmentRepo::create(
        &mut conn,
        &new_attachment("3/ab/cd/token/shot.png", Some("3/ab/cd/token/thumbnail-shot.png")),
    )
    .await
    .unwrap();

    let mut log = new_log("with-file", "see screenshot");
    log.attachment_id = Some(attachment_id);
    assert!(LogRepo::insert_one(&mut conn, &log).await.unwrap());

    let stored = LogRepo::find_by_uuid(&mut conn, "with-file").await.unwrap().unwrap();
    assert_eq!(stored.attachment_id, Some(attachment_id));

    let attachment = AttachmentRepo::find_by_id(&mut conn, attachment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attachment.file_id, "3/ab/cd/token/shot.png");
    assert_eq!(
        attachment.thumbnail_id.as_deref(),
        Some("3/ab/cd/token/thumbnail-shot.png")
    );
    assert_eq!(attachment.project_id, Some(3));
    assert_eq!(attachment.launch_id, Some(4));
}

#[sqlx::test(migrations = "./migrations")]
async fn single_insert_skips_duplicate_uuid(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let log = new_log("once", "message");
    assert!(LogRepo::insert_one(&mut conn, &log).await.unwrap());
    assert!(!LogRepo::insert_one(&mut conn, &log).await.unwrap());
    assert_eq!(LogRepo::count(&mut conn).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn exists_reflects_inserted_rows(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    assert!(!LogRepo::exists(&mut conn, "x").await.unwrap());
    LogRepo::insert_batch(&mut conn, &[new_log("x", "m")]).await.unwrap();
    assert!(LogRepo::exists(&mut conn, "x").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn log_cannot_reference_missing_attachment(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let mut log = new_log("orphan", "message");
    log.attachment_id = Some(9_999);
    let err = LogRepo::insert_one(&mut conn, &log).await.unwrap_err();
    assert!(!is_null_byte_violation(&err));
}

#[sqlx::test(migrations = "./migrations")]
async fn attachments_listed_by_item(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    AttachmentRepo::create(&mut conn, &new_attachment("a", None)).await.unwrap();
    AttachmentRepo::create(&mut conn, &new_attachment("b", None)).await.unwrap();

    let listed = AttachmentRepo::list_by_item(&mut conn, 1).await.unwrap();
    let files: Vec<&str> = listed.iter().map(|a| a.file_id.as_str()).collect();
    assert_eq!(files, ["a", "b"]);
    assert!(listed.iter().all(|a| a.thumbnail_id.is_none()));
}
