//! Client for the hosted flow-execution endpoint (the routed LLM backend).

use async_trait::async_trait;
use engagegov_core::config::FlowConfig;
use engagegov_core::{FlowEnvelope, InvokeError};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::invoker::ResilientInvoker;

#[derive(Debug, Serialize)]
struct FlowRequest<'a> {
    input_value: &'a str,
    output_type: &'a str,
    input_type: &'a str,
}

/// Seam for the inquiry backend so the pipeline can be exercised without a
/// live flow endpoint.
#[async_trait]
pub trait InquiryFlow: Send + Sync {
    async fn run(&self, message: &str) -> Result<FlowEnvelope, InvokeError>;
}

#[derive(Clone, Debug)]
pub struct FlowClient {
    http: reqwest::Client,
    invoker: ResilientInvoker,
    config: FlowConfig,
}

impl FlowClient {
    pub fn new(http: reqwest::Client, invoker: ResilientInvoker, config: FlowConfig) -> Self {
        Self { http, invoker, config }
    }

    fn run_url(&self) -> String {
        format!(
            "{}/lf/{}/api/v1/run/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.workspace_id,
            self.config.endpoint
        )
    }
}

#[async_trait]
impl InquiryFlow for FlowClient {
    async fn run(&self, message: &str) -> Result<FlowEnvelope, InvokeError> {
        let url = self.run_url();
        let value = self
            .invoker
            .invoke(|| {
                self.http
                    .post(&url)
                    .bearer_auth(self.config.app_token.expose_secret())
                    .json(&FlowRequest {
                        input_value: message,
                        output_type: "chat",
                        input_type: "chat",
                    })
            })
            .await?;

        serde_json::from_value::<FlowEnvelope>(value)
            .map_err(|error| InvokeError::MalformedResponse(error.to_string()))
    }
}
