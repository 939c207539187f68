use std::path::PathBuf;

use logmig_core::error::CoreError;
use logmig_storage::ThumbnailSize;

/// Writer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// PostgreSQL connection string of the target database.
    pub database_url: String,
    /// Connection pool size (default: `20`).
    pub max_connections: u32,
    /// Directory the filesystem blob store writes under.
    pub blob_store_root: PathBuf,
    /// Bounding box for image thumbnails (default: `100x55`).
    pub thumbnail_size: ThumbnailSize,
}

impl WriterConfig {
    /// Load configuration from `.env` and the process environment.
    ///
    /// | Env Var              | Default              |
    /// |----------------------|----------------------|
    /// | `DATABASE_URL`       | required             |
    /// | `DB_MAX_CONNECTIONS` | `20`                 |
    /// | `BLOB_STORE_ROOT`    | `./data/attachments` |
    /// | `THUMBNAIL_WIDTH`    | `100`                |
    /// | `THUMBNAIL_HEIGHT`   | `55`                 |
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let database_url = var("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| CoreError::Validation("DATABASE_URL must be set".into()))?;

        let max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 20u32)?;
        if max_connections == 0 {
            return Err(CoreError::Validation(
                "DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }

        let blob_store_root = var("BLOB_STORE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/attachments"));

        let defaults = ThumbnailSize::default();
        let thumbnail_size = ThumbnailSize {
            width: parse_or(&var, "THUMBNAIL_WIDTH", defaults.width)?,
            height: parse_or(&var, "THUMBNAIL_HEIGHT", defaults.height)?,
        };
        if thumbnail_size.width == 0 || thumbnail_size.height == 0 {
            return Err(CoreError::Validation(
                "THUMBNAIL_WIDTH and THUMBNAIL_HEIGHT must be positive".into(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            blob_store_root,
            thumbnail_size,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, CoreError> {
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("{key} must be a valid number, got '{raw}'"))),
        None => Ok(default),
    }
}
