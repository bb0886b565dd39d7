// Extraction service clients

pub mod http;

pub use http::HttpExtractionClient;

use crate::models::{ParameterMap, SelectedFile};
use async_trait::async_trait;
use thiserror::Error;

/// Shown when the service gives no usable reason for a failure.
pub const FALLBACK_ERROR_MESSAGE: &str = "Analysis failed";

/// Multipart field the service reads the document from.
pub const FILE_FIELD: &str = "file";

pub const EXTRACT_PATH: &str = "/extract";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Extraction request failed: {0}")]
    Transport(String),

    #[error("Extraction service returned HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Invalid extraction response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// The message shown to the user: the service's `detail` when it sent
    /// one, otherwise [`FALLBACK_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Status {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Upload one document and return the extracted parameters.
    async fn extract(&self, file: &SelectedFile) -> Result<ParameterMap, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ServiceError::Status {
            status: 422,
            detail: Some("corrupt file".to_string()),
        };
        assert_eq!(err.user_message(), "corrupt file");
    }

    #[test]
    fn test_user_message_fallbacks() {
        let no_detail = ServiceError::Status {
            status: 500,
            detail: None,
        };
        let empty_detail = ServiceError::Status {
            status: 400,
            detail: Some(String::new()),
        };
        let transport = ServiceError::Transport("connection refused".to_string());
        let invalid = ServiceError::InvalidResponse("missing field `parameters`".to_string());

        for err in [no_detail, empty_detail, transport, invalid] {
            assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
        }
    }
}
