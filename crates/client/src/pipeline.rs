//! Sequential report-processing pipeline.
//!
//! Each submission drives at most four external calls, one after another;
//! stages downstream of an empty result are skipped. All session state is
//! caller-owned: the pipeline itself holds only clients and the rule table.

use engagegov_core::routing::MinistryRouter;
use engagegov_core::PipelineError;
use tracing::info;
use uuid::Uuid;

use crate::flow::{FlowClient, InquiryFlow};
use crate::llm::TextClient;
use crate::ocr::OcrClient;

pub const NO_OUTPUTS_FALLBACK: &str = "No relevant outputs received from the API.";

/// Everything extracted from one image report. Fields downstream of an empty
/// stage stay empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    pub extracted_text: String,
    pub summary: String,
    pub insights: String,
    pub ministry: &'static str,
}

/// Result of a free-text inquiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InquiryOutcome {
    pub response: String,
    pub ministry: &'static str,
}

pub struct ReportPipeline<F = FlowClient> {
    ocr: OcrClient,
    text: TextClient,
    flow: F,
    router: MinistryRouter,
}

impl<F> ReportPipeline<F>
where
    F: InquiryFlow,
{
    pub fn new(ocr: OcrClient, text: TextClient, flow: F, router: MinistryRouter) -> Self {
        Self { ocr, text, flow, router }
    }

    /// OCR, then summarize, then derive insights; the ministry suggestion is
    /// computed from the extracted text.
    pub async fn process_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ReportOutcome, PipelineError> {
        let correlation_id = Uuid::new_v4().simple().to_string();
        self.ocr.check_image_size(image.len() as u64)?;

        info!(
            event_name = "pipeline.image.extract_start",
            correlation_id = %correlation_id,
            size_bytes = image.len(),
            "extracting text from image"
        );
        let extracted_text = self.ocr.extract_text(image, mime_type).await?;

        let mut outcome = ReportOutcome {
            ministry: self.router.classify(&extracted_text),
            extracted_text,
            ..ReportOutcome::default()
        };

        if outcome.extracted_text.trim().is_empty() {
            info!(
                event_name = "pipeline.image.no_text",
                correlation_id = %correlation_id,
                "no text extracted; skipping summary and insights"
            );
            return Ok(outcome);
        }

        info!(
            event_name = "pipeline.image.summarize_start",
            correlation_id = %correlation_id,
            "summarizing extracted text"
        );
        outcome.summary = self.text.summarize(&outcome.extracted_text).await?;

        if outcome.summary.trim().is_empty() {
            return Ok(outcome);
        }

        info!(
            event_name = "pipeline.image.insights_start",
            correlation_id = %correlation_id,
            "generating actionable insights"
        );
        outcome.insights = self.text.insights(&outcome.summary).await?;

        info!(
            event_name = "pipeline.image.complete",
            correlation_id = %correlation_id,
            ministry = outcome.ministry,
            "image report processed"
        );
        Ok(outcome)
    }

    /// Runs the inquiry through the flow endpoint and suggests a ministry
    /// from the raw text.
    pub async fn process_inquiry(&self, query: &str) -> Result<InquiryOutcome, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let correlation_id = Uuid::new_v4().simple().to_string();
        info!(
            event_name = "pipeline.inquiry.flow_start",
            correlation_id = %correlation_id,
            "submitting inquiry to flow endpoint"
        );

        let envelope = self.flow.run(query).await.map_err(PipelineError::from)?;
        let response = if envelope.is_empty() {
            NO_OUTPUTS_FALLBACK.to_string()
        } else {
            envelope.joined("\n\n")
        };

        let ministry = self.router.classify(query);
        info!(
            event_name = "pipeline.inquiry.complete",
            correlation_id = %correlation_id,
            ministry,
            "inquiry processed"
        );

        Ok(InquiryOutcome { response, ministry })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use engagegov_core::config::{AppConfig, RetryConfig};
    use engagegov_core::routing::MinistryRouter;
    use engagegov_core::{FlowEnvelope, InvokeError, PipelineError};

    use super::{ReportPipeline, NO_OUTPUTS_FALLBACK};
    use crate::flow::InquiryFlow;
    use crate::invoker::ResilientInvoker;
    use crate::llm::TextClient;
    use crate::ocr::OcrClient;

    struct StubFlow {
        raw: &'static str,
    }

    #[async_trait]
    impl InquiryFlow for StubFlow {
        async fn run(&self, _message: &str) -> Result<FlowEnvelope, InvokeError> {
            serde_json::from_str(self.raw)
                .map_err(|error| InvokeError::MalformedResponse(error.to_string()))
        }
    }

    fn pipeline(flow: StubFlow) -> ReportPipeline<StubFlow> {
        let config = AppConfig::default();
        let invoker = ResilientInvoker::new(&RetryConfig { max_attempts: 1, base_delay_ms: 1 });
        ReportPipeline::new(
            OcrClient::new(reqwest::Client::new(), invoker.clone(), config.ocr),
            TextClient::new(reqwest::Client::new(), invoker, config.content),
            flow,
            MinistryRouter::default(),
        )
    }

    #[tokio::test]
    async fn blank_inquiry_is_rejected_before_any_call() {
        let pipeline = pipeline(StubFlow { raw: "{}" });
        let error = pipeline.process_inquiry("   ").await.err().expect("blank input");
        assert_eq!(error, PipelineError::EmptyInput);
    }

    #[tokio::test]
    async fn empty_envelope_falls_back_to_the_no_outputs_message() {
        let pipeline = pipeline(StubFlow { raw: "{}" });
        let outcome = pipeline
            .process_inquiry("who handles waste dump complaints?")
            .await
            .expect("inquiry should succeed");
        assert_eq!(outcome.response, NO_OUTPUTS_FALLBACK);
        assert_eq!(outcome.ministry, "Ministry of Environment");
    }

    #[tokio::test]
    async fn inquiry_response_joins_envelope_leaves_as_bullets() {
        let pipeline = pipeline(StubFlow {
            raw: r#"{"outputs":[{"outputs":[
                {"results":{"message":{"text":"Report forwarded."}}},
                {"results":{"message":{"text":"Expect a reply in 3 days."}}}
            ]}]}"#,
        });
        let outcome = pipeline
            .process_inquiry("pothole on the highway near downtown")
            .await
            .expect("inquiry should succeed");
        assert_eq!(outcome.response, "- Report forwarded.\n\n- Expect a reply in 3 days.");
        assert_eq!(outcome.ministry, "Ministry of Transport");
    }

    #[tokio::test]
    async fn oversized_image_fails_before_any_network_call() {
        let mut config = AppConfig::default();
        config.ocr.max_image_bytes = 8;
        // Unroutable base_url: reaching the network would fail the test
        // with a different error than the size guard.
        config.ocr.base_url = "http://127.0.0.1:9".to_string();

        let invoker = ResilientInvoker::new(&RetryConfig { max_attempts: 1, base_delay_ms: 1 });
        let pipeline = ReportPipeline::new(
            OcrClient::new(reqwest::Client::new(), invoker.clone(), config.ocr),
            TextClient::new(reqwest::Client::new(), invoker, config.content),
            StubFlow { raw: "{}" },
            MinistryRouter::default(),
        );

        let error = pipeline
            .process_image(b"larger than eight", "image/png")
            .await
            .err()
            .expect("oversized image");
        assert!(matches!(error, PipelineError::ImageTooLarge { limit_bytes: 8, .. }));
    }
}
