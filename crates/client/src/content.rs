//! Content-generation client over the OpenAI-compatible chat endpoint.

use engagegov_core::config::ContentConfig;
use engagegov_core::InvokeError;

use crate::invoker::ResilientInvoker;
use crate::llm::chat_completion;

const CONTENT_SYSTEM_PROMPT: &str = "You are an experienced content writer.";

/// One generation request. Tone, creativity, and length fall back to the
/// configured defaults when unset.
#[derive(Clone, Debug, Default)]
pub struct ContentRequest {
    pub prompt: String,
    pub tone: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ContentClient {
    http: reqwest::Client,
    invoker: ResilientInvoker,
    config: ContentConfig,
}

impl ContentClient {
    pub fn new(http: reqwest::Client, invoker: ResilientInvoker, config: ContentConfig) -> Self {
        Self { http, invoker, config }
    }

    pub(crate) fn format_prompt(&self, request: &ContentRequest) -> String {
        let tone = request.tone.as_deref().unwrap_or(&self.config.default_tone);
        format!(
            "Based on the prompt below generate dynamic content, let it be in the tone \
             specified and optimize the content for SEO using the keywords if specified.\n\
             Prompt: {}\nTone: {}",
            request.prompt, tone
        )
    }

    pub async fn generate(&self, request: &ContentRequest) -> Result<String, InvokeError> {
        let temperature = request.temperature.unwrap_or(self.config.temperature);
        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        let user_prompt = self.format_prompt(request);

        chat_completion(
            &self.http,
            &self.invoker,
            &self.config,
            CONTENT_SYSTEM_PROMPT,
            &user_prompt,
            temperature,
            max_tokens,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use engagegov_core::config::{AppConfig, RetryConfig};

    use super::{ContentClient, ContentRequest};
    use crate::invoker::ResilientInvoker;

    fn client() -> ContentClient {
        ContentClient::new(
            reqwest::Client::new(),
            ResilientInvoker::new(&RetryConfig { max_attempts: 1, base_delay_ms: 1 }),
            AppConfig::default().content,
        )
    }

    #[test]
    fn prompt_carries_the_requested_tone() {
        let formatted = client().format_prompt(&ContentRequest {
            prompt: "announce the new reporting portal".to_string(),
            tone: Some("casual".to_string()),
            ..ContentRequest::default()
        });
        assert!(formatted.contains("Prompt: announce the new reporting portal"));
        assert!(formatted.contains("Tone: casual"));
    }

    #[test]
    fn tone_falls_back_to_the_configured_default() {
        let formatted = client().format_prompt(&ContentRequest {
            prompt: "road safety campaign".to_string(),
            ..ContentRequest::default()
        });
        assert!(formatted.contains("Tone: professional"));
    }
}
