use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use url::Url;

use super::Transport;
use crate::domain::classification::ClassificationResult;
use crate::domain::error::{AppError, Result};
use crate::domain::submission::{FieldValue, SubmissionRequest};

pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, base })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base.join(endpoint).map_err(|e| {
            AppError::ValidationError(format!("Invalid endpoint '{}': {}", endpoint, e))
        })
    }
}

/// Builds the multipart body; fields keep their order and are not altered.
pub fn build_form(request: &SubmissionRequest) -> Result<Form> {
    let mut form = Form::new();
    for field in &request.fields {
        match &field.value {
            FieldValue::Text(value) => {
                form = form.text(field.name.clone(), value.clone());
            }
            FieldValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let mut part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(content_type) = content_type.as_ref() {
                    part = part.mime_str(content_type).map_err(|_| {
                        AppError::ValidationError(format!(
                            "Invalid content type '{}' for field '{}'",
                            content_type, field.name
                        ))
                    })?;
                }
                form = form.part(field.name.clone(), part);
            }
        }
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_multipart(
        &self,
        endpoint: &str,
        request: &SubmissionRequest,
    ) -> Result<ClassificationResult> {
        let url = self.endpoint_url(endpoint)?;
        let form = build_form(request)?;

        tracing::debug!(url = %url, "{}", request.summary());

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("POST {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::NetworkError(format!("Failed to read response from {}: {}", url, e))
        })?;

        ClassificationResult::from_json(&body).map_err(|e| {
            AppError::ParseError(format!(
                "status={} body_len={}: {}",
                status.as_u16(),
                body.len(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(uri: &str) -> HttpTransport {
        HttpTransport::new(Url::parse(uri).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_multipart_and_decodes_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"email_text\""))
            .and(body_string_contains("Por favor, envie o anexo."))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "category": "Produtivo",
                "suggested_response": "Segue o anexo.",
                "confidence": 0.87
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = SubmissionRequest::new().text("email_text", "Por favor, envie o anexo.");
        let result = transport_for(&mock_server.uri())
            .send_multipart("/upload", &request)
            .await
            .unwrap();

        assert_eq!(result, ClassificationResult::new("Produtivo", "Segue o anexo."));
    }

    #[tokio::test]
    async fn test_forwards_file_attachment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(body_string_contains("filename=\"email.txt\""))
            .and(body_string_contains("Reunião às 10h"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "category": "Produtivo",
                "suggested_response": "Confirmado."
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = SubmissionRequest::new().file(
            "file",
            "email.txt",
            Some("text/plain".to_string()),
            "Reunião às 10h".as_bytes().to_vec(),
        );
        let result = transport_for(&mock_server.uri())
            .send_multipart("/upload", &request)
            .await
            .unwrap();

        assert_eq!(result.category, "Produtivo");
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("<h1>Internal Server Error</h1>"),
            )
            .mount(&mock_server)
            .await;

        let err = transport_for(&mock_server.uri())
            .send_multipart("/upload", &SubmissionRequest::new().text("email_text", "x"))
            .await
            .unwrap_err();

        match err {
            AppError::ParseError(msg) => assert!(msg.contains("status=500")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let transport = transport_for("http://127.0.0.1:9");
        let err = transport
            .send_multipart("/upload", &SubmissionRequest::new().text("email_text", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NetworkError(_)));
    }

    #[test]
    fn test_invalid_content_type_is_rejected() {
        let request =
            SubmissionRequest::new().file("file", "a.bin", Some("not a mime".into()), vec![1]);
        assert!(matches!(build_form(&request), Err(AppError::ValidationError(_))));
    }
}
