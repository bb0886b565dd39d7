// Type definitions and error enums

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a file: {0:?}")]
    NotAFile(PathBuf),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
