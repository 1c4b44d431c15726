//! Image-to-text extraction client.
//!
//! Oversized payloads are rejected before any encoding or network traffic.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use engagegov_core::config::OcrConfig;
use engagegov_core::{InvokeError, PipelineError};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::invoker::ResilientInvoker;

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    image_base64: String,
    mime_type: &'a str,
    model: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    text: String,
}

#[derive(Clone, Debug)]
pub struct OcrClient {
    http: reqwest::Client,
    invoker: ResilientInvoker,
    config: OcrConfig,
}

impl OcrClient {
    pub fn new(http: reqwest::Client, invoker: ResilientInvoker, config: OcrConfig) -> Self {
        Self { http, invoker, config }
    }

    pub fn max_image_bytes(&self) -> u64 {
        self.config.max_image_bytes
    }

    /// Guard applied before encoding: the byte limit is a product contract,
    /// not a transport concern.
    pub fn check_image_size(&self, size_bytes: u64) -> Result<(), PipelineError> {
        if size_bytes > self.config.max_image_bytes {
            return Err(PipelineError::ImageTooLarge {
                size_bytes,
                limit_bytes: self.config.max_image_bytes,
            });
        }
        Ok(())
    }

    /// Extracted plain text, or an empty string when the service finds none.
    pub async fn extract_text(&self, image: &[u8], mime_type: &str) -> Result<String, PipelineError> {
        self.check_image_size(image.len() as u64)?;

        let url = format!("{}/v1/extract", self.config.base_url.trim_end_matches('/'));
        let encoded = BASE64_STANDARD.encode(image);
        let value = self
            .invoker
            .invoke(|| {
                let mut request = self.http.post(&url).json(&ExtractRequest {
                    image_base64: encoded.clone(),
                    mime_type,
                    model: &self.config.model,
                });
                if let Some(api_key) = &self.config.api_key {
                    request = request.bearer_auth(api_key.expose_secret());
                }
                request
            })
            .await?;

        let response: ExtractResponse = serde_json::from_value(value)
            .map_err(|error| InvokeError::MalformedResponse(error.to_string()))
            .map_err(PipelineError::from)?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use engagegov_core::config::AppConfig;
    use engagegov_core::config::RetryConfig;
    use engagegov_core::PipelineError;

    use super::OcrClient;
    use crate::invoker::ResilientInvoker;

    fn client_with_limit(limit_bytes: u64) -> OcrClient {
        let mut config = AppConfig::default().ocr;
        config.max_image_bytes = limit_bytes;
        OcrClient::new(
            reqwest::Client::new(),
            ResilientInvoker::new(&RetryConfig { max_attempts: 1, base_delay_ms: 1 }),
            config,
        )
    }

    #[test]
    fn payload_at_the_limit_is_accepted() {
        let client = client_with_limit(1024);
        assert!(client.check_image_size(1024).is_ok());
    }

    #[test]
    fn payload_above_the_limit_is_rejected() {
        let client = client_with_limit(1024);
        let error = client.check_image_size(1025).err().expect("oversized payload");
        assert!(matches!(
            error,
            PipelineError::ImageTooLarge { size_bytes: 1025, limit_bytes: 1024 }
        ));
    }
}
