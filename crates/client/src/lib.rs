pub mod content;
pub mod flow;
pub mod invoker;
pub mod llm;
pub mod ocr;
pub mod pipeline;

pub use content::{ContentClient, ContentRequest};
pub use flow::{FlowClient, InquiryFlow};
pub use invoker::ResilientInvoker;
pub use llm::TextClient;
pub use ocr::OcrClient;
pub use pipeline::{InquiryOutcome, ReportOutcome, ReportPipeline, NO_OUTPUTS_FALLBACK};

use engagegov_core::config::AppConfig;
use engagegov_core::routing::MinistryRouter;

/// Builds the full client set from one config, sharing a single HTTP client
/// and retry policy.
pub fn build_pipeline(config: &AppConfig) -> ReportPipeline {
    let http = reqwest::Client::new();
    let invoker = ResilientInvoker::new(&config.retry);

    ReportPipeline::new(
        OcrClient::new(http.clone(), invoker.clone(), config.ocr.clone()),
        TextClient::new(http.clone(), invoker.clone(), config.content.clone()),
        FlowClient::new(http, invoker, config.flow.clone()),
        MinistryRouter::default(),
    )
}

/// Content generation shares the pipeline's HTTP stack but is invoked
/// independently of report processing.
pub fn build_content_client(config: &AppConfig) -> ContentClient {
    ContentClient::new(
        reqwest::Client::new(),
        ResilientInvoker::new(&config.retry),
        config.content.clone(),
    )
}
