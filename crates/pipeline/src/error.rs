use logmig_core::error::MappingError;
use logmig_db::errors::is_null_byte_violation;
use logmig_storage::StorageError;

/// Failure of one batch write. Every variant except a first null-byte
/// violation is fatal for the batch and surfaces to the caller.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Blob store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to read attachment payload of log {uuid:?}: {source}")]
    Payload {
        uuid: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl WriteError {
    /// Whether this is the database rejecting a NUL character in a text value.
    pub fn is_null_byte_violation(&self) -> bool {
        matches!(self, Self::Database(err) if is_null_byte_violation(err))
    }

    /// Short error class for log fields.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Database(_) if self.is_null_byte_violation() => "null_byte",
            Self::Database(_) => "database",
            Self::Storage(StorageError::Thumbnail(_)) => "thumbnail",
            Self::Storage(_) => "blob_store",
            Self::Payload { .. } => "payload",
            Self::Mapping(_) => "mapping",
        }
    }
}

/// Failure while wiring a [`LogWriter`](crate::LogWriter) from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
