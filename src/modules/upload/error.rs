use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("Access type '{0}' is not allowed")]
    ForbiddenAccessType(String),

    #[error("Content type '{0}' is not allowed")]
    ForbiddenContentType(String),

    #[error("Storage key is too long: {actual} bytes (maximum {max} bytes)")]
    KeyTooLong { actual: usize, max: usize },

    #[error("Storage provider error: {0}")]
    StorageProvider(String),

    #[error("Key is required for deletion")]
    MissingKey,
}

pub type UploadResult<T> = Result<T, UploadError>;
