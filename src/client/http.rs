// HTTP client for the extraction service
//
// POST {base}/extract, multipart body with one `file` part.
// Success: {"parameters": {...}}
// Failure: any non-2xx, optionally {"detail": "..."}

use super::{ExtractionService, ServiceError, EXTRACT_PATH, FILE_FIELD};
use crate::config::ServiceConfig;
use crate::models::{ParameterMap, SelectedFile};
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct HttpExtractionClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ExtractResponse {
    parameters: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl HttpExtractionClient {
    /// Client without a transport timeout.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> AppResult<Self> {
        Self::with_timeout(
            config.base_url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EXTRACT_PATH)
    }

    fn build_form(file: &SelectedFile) -> Result<Form, ServiceError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.filename().to_string())
            .mime_str(file.media_type())
            .map_err(|e| ServiceError::Transport(format!("invalid media type: {}", e)))?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

/// Pull a usable `detail` string out of an error body. Anything other than a
/// non-empty JSON string yields `None`.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Value::String(detail) if !detail.is_empty() => Some(detail),
        other => {
            debug!("Ignoring non-string error detail: {}", other);
            None
        }
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionClient {
    async fn extract(&self, file: &SelectedFile) -> Result<ParameterMap, ServiceError> {
        let url = self.endpoint();
        info!(
            "Uploading {} ({} bytes, {}) to {}",
            file.filename(),
            file.len(),
            file.media_type(),
            url
        );

        let form = Self::build_form(file)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read error body from extraction service: {}", e);
                    String::new()
                }
            };
            let detail = parse_detail(&body);
            warn!("Extraction service returned {}: {:?}", status, detail);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ExtractResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        let parameters = ParameterMap::from(body.parameters);
        info!("Extracted {} parameters from {}", parameters.len(), file.filename());
        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParameterValue;
    use mockito::Matcher;

    fn sample_file() -> SelectedFile {
        SelectedFile::from_bytes("atr.txt", b"Putere instalata: 150 kW".to_vec())
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = HttpExtractionClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/extract");

        let client = HttpExtractionClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/extract");
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(
            parse_detail(r#"{"detail": "corrupt file"}"#),
            Some("corrupt file".to_string())
        );
        assert_eq!(parse_detail(r#"{"message": "nope"}"#), None);
        assert_eq!(parse_detail(r#"{"detail": ""}"#), None);
        assert_eq!(parse_detail(r#"{"detail": [{"loc": ["body", "file"]}]}"#), None);
        assert_eq!(parse_detail(r#"{"detail": 42}"#), None);
        assert_eq!(parse_detail("Internal Server Error"), None);
        assert_eq!(parse_detail(""), None);
    }

    #[tokio::test]
    async fn test_extract_success_sends_multipart_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/extract")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="atr.txt""#.to_string()),
                Matcher::Regex("Content-Type: text/plain".to_string()),
                Matcher::Regex("Putere instalata: 150 kW".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"parameters": {"voltage": "20 kV", "power_kw": 150, "phases": [1, 2, 3]}}"#,
            )
            .create_async()
            .await;

        let client = HttpExtractionClient::new(server.url()).unwrap();
        let params = client.extract(&sample_file()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["voltage", "power_kw", "phases"]);
        assert_eq!(params.get("voltage"), Some(&ParameterValue::Text("20 kV".into())));
        assert_eq!(params.get("power_kw").unwrap().to_string(), "150");
        assert_eq!(params.get("phases").unwrap().to_string(), "[1,2,3]");
    }

    #[tokio::test]
    async fn test_extract_error_with_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/extract")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "corrupt file"}"#)
            .create_async()
            .await;

        let client = HttpExtractionClient::new(server.url()).unwrap();
        let err = client.extract(&sample_file()).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::Status {
                status: 422,
                detail: Some("corrupt file".to_string())
            }
        );
        assert_eq!(err.user_message(), "corrupt file");
    }

    #[tokio::test]
    async fn test_extract_error_without_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/extract")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = HttpExtractionClient::new(server.url()).unwrap();
        let err = client.extract(&sample_file()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Status { status: 500, detail: None }));
        assert_eq!(err.user_message(), "Analysis failed");
    }

    #[tokio::test]
    async fn test_extract_success_without_parameters_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/extract")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"parameters": "not a map"}"#)
            .create_async()
            .await;

        let client = HttpExtractionClient::new(server.url()).unwrap();
        let err = client.extract(&sample_file()).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidResponse(_)));
        assert_eq!(err.user_message(), "Analysis failed");
    }

    #[tokio::test]
    async fn test_extract_transport_failure() {
        // Nothing listens on port 9 locally
        let client = HttpExtractionClient::with_timeout(
            "http://127.0.0.1:9",
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.extract(&sample_file()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
        assert_eq!(err.user_message(), "Analysis failed");
    }

    #[tokio::test]
    async fn test_extract_timeout_is_transport_failure() {
        // Accepts the connection but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = HttpExtractionClient::with_timeout(
            format!("http://{}", addr),
            Some(Duration::from_millis(200)),
        )
        .unwrap();
        let err = client.extract(&sample_file()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
        assert_eq!(err.user_message(), "Analysis failed");
        server.abort();
    }
}
