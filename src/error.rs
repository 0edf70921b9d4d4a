use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinehistError>;

#[derive(Error, Debug)]
pub enum LinehistError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Scan error: {0}")]
    Scan(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
