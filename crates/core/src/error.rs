#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// A source record could not be turned into a `log` row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("Source log {uuid:?} is missing required field '{field}'")]
    MissingField { uuid: String, field: &'static str },
}
