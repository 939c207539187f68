/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All persisted timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Timestamps as they come out of the legacy store, zone attached.
pub type SourceTimestamp = chrono::DateTime<chrono::FixedOffset>;
