pub mod http;

use crate::domain::classification::ClassificationResult;
use crate::domain::error::Result;
use crate::domain::submission::SubmissionRequest;
use async_trait::async_trait;

pub use http::HttpTransport;

/// Sends a form snapshot as a multipart body and decodes the classification.
///
/// Implementations report connectivity problems as `AppError::NetworkError`
/// and undecodable bodies as `AppError::ParseError`.
#[async_trait]
pub trait Transport {
    async fn send_multipart(
        &self,
        endpoint: &str,
        request: &SubmissionRequest,
    ) -> Result<ClassificationResult>;
}
