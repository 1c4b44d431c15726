//! OpenAI-compatible chat-completion plumbing shared by the text and
//! content-generation clients.

use engagegov_core::config::ContentConfig;
use engagegov_core::InvokeError;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::invoker::ResilientInvoker;

const SUMMARIZE_SYSTEM_PROMPT: &str =
    "You summarize citizen reports for government triage. Return a short plain-text \
     summary of the report, keeping every concrete fact (places, dates, quantities).";

const INSIGHT_SYSTEM_PROMPT: &str =
    "You advise government service teams. Given a summarized citizen report, return \
     plain-text actionable recommendations for the responsible ministry.";

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub n: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: ChatResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatResponse {
    /// First choice text, trimmed; empty when the remote returned no choices.
    pub fn first_text(&self) -> String {
        self.choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default()
    }
}

pub(crate) async fn chat_completion(
    http: &reqwest::Client,
    invoker: &ResilientInvoker,
    config: &ContentConfig,
    system: &str,
    user: &str,
    temperature: f64,
    max_tokens: u32,
) -> Result<String, InvokeError> {
    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    let value = invoker
        .invoke(|| {
            let mut request = http.post(&url).json(&ChatRequest {
                model: &config.model,
                messages: vec![
                    ChatMessage { role: "system", content: system },
                    ChatMessage { role: "user", content: user },
                ],
                temperature,
                max_tokens,
                n: 1,
            });
            if let Some(api_key) = &config.api_key {
                request = request.bearer_auth(api_key.expose_secret());
            }
            request
        })
        .await?;

    let response: ChatResponse = serde_json::from_value(value)
        .map_err(|error| InvokeError::MalformedResponse(error.to_string()))?;
    Ok(response.first_text())
}

/// Summarization and insight generation over the chat-completion endpoint.
#[derive(Clone, Debug)]
pub struct TextClient {
    http: reqwest::Client,
    invoker: ResilientInvoker,
    config: ContentConfig,
}

impl TextClient {
    pub fn new(http: reqwest::Client, invoker: ResilientInvoker, config: ContentConfig) -> Self {
        Self { http, invoker, config }
    }

    /// Shorter plain-text summary of a report.
    pub async fn summarize(&self, text: &str) -> Result<String, InvokeError> {
        chat_completion(
            &self.http,
            &self.invoker,
            &self.config,
            SUMMARIZE_SYSTEM_PROMPT,
            text,
            0.2,
            self.config.max_tokens,
        )
        .await
    }

    /// Actionable recommendations derived from a summary.
    pub async fn insights(&self, summary: &str) -> Result<String, InvokeError> {
        chat_completion(
            &self.http,
            &self.invoker,
            &self.config,
            INSIGHT_SYSTEM_PROMPT,
            summary,
            self.config.temperature,
            self.config.max_tokens,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::ChatResponse;

    #[test]
    fn first_text_is_trimmed() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"  summary here \n"}}]}"#,
        )
        .expect("chat response should decode");
        assert_eq!(response.first_text(), "summary here");
    }

    #[test]
    fn missing_choices_degrade_to_empty_text() {
        let response: ChatResponse = serde_json::from_str("{}").expect("decode");
        assert_eq!(response.first_text(), "");

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{}]}"#).expect("decode");
        assert_eq!(response.first_text(), "");
    }
}
