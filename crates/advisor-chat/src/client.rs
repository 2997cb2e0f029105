//! Gemini REST client and the backend seam the dispatcher talks through.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ChatError;
use crate::model::ModelKind;
use crate::protocol::{GenerateContentRequest, GenerateContentResponse};

/// Seam between the dispatcher and the model provider. Production uses
/// [`GeminiClient`]; tests substitute a scripted mock.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(
        &self,
        model: ModelKind,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChatError>;
}

/// reqwest-based client for `models/{id}:generateContent`.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, model: ModelKind) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model.id())
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(
        &self,
        model: ModelKind,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ChatError> {
        debug!(model = model.id(), contents = request.contents.len(), "calling Gemini");

        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "test-key",
            30,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(ModelKind::Flash20),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            client.endpoint(ModelKind::Pro25),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
