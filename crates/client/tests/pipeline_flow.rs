//! End-to-end pipeline tests against simulated OCR, chat, and flow services.

use engagegov_client::{
    FlowClient, InquiryFlow, OcrClient, ReportPipeline, ResilientInvoker, TextClient,
};
use engagegov_core::config::AppConfig;
use engagegov_core::routing::MinistryRouter;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.flow.base_url = server.uri();
    config.flow.workspace_id = "ws-test".to_string();
    config.flow.endpoint = "engagegov".to_string();
    config.flow.app_token = "AstraCS:test-token".to_string().into();
    config.ocr.base_url = server.uri();
    config.content.base_url = server.uri();
    config.retry.max_attempts = 2;
    config.retry.base_delay_ms = 5;
    config
}

fn pipeline_for(config: &AppConfig) -> ReportPipeline {
    let http = reqwest::Client::new();
    let invoker = ResilientInvoker::new(&config.retry);
    ReportPipeline::new(
        OcrClient::new(http.clone(), invoker.clone(), config.ocr.clone()),
        TextClient::new(http.clone(), invoker.clone(), config.content.clone()),
        FlowClient::new(http, invoker, config.flow.clone()),
        MinistryRouter::default(),
    )
}

fn chat_body(text: &str) -> serde_json::Value {
    json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
}

#[tokio::test]
async fn image_report_runs_extract_summarize_insights_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Pothole on the highway near downtown, growing for two weeks."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Summary text.")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Dispatch a road crew.")))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let outcome = pipeline_for(&config)
        .process_image(b"fake image bytes", "image/jpeg")
        .await
        .expect("image pipeline should succeed");

    assert!(outcome.extracted_text.starts_with("Pothole on the highway"));
    assert_eq!(outcome.summary, "Summary text.");
    assert_eq!(outcome.insights, "Dispatch a road crew.");
    assert_eq!(outcome.ministry, "Ministry of Transport");
}

#[tokio::test]
async fn empty_extraction_skips_summary_and_insights() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": ""})))
        .expect(1)
        .mount(&server)
        .await;
    // The chat endpoint must never be called when extraction is empty.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("unexpected")))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let outcome = pipeline_for(&config)
        .process_image(b"blank page", "image/png")
        .await
        .expect("empty extraction is not an error");

    assert_eq!(outcome.extracted_text, "");
    assert_eq!(outcome.summary, "");
    assert_eq!(outcome.insights, "");
    assert_eq!(outcome.ministry, "General");
}

#[tokio::test]
async fn flow_client_sends_the_chat_payload_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lf/ws-test/api/v1/run/engagegov"))
        .and(header("authorization", "Bearer AstraCS:test-token"))
        .and(body_partial_json(json!({
            "input_value": "which ministry fixes roads?",
            "output_type": "chat",
            "input_type": "chat"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": [{"outputs": [{"results": {"message": {"text": "Ministry of Transport handles road repair."}}}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let http = reqwest::Client::new();
    let client = FlowClient::new(
        http,
        ResilientInvoker::new(&config.retry),
        config.flow.clone(),
    );

    let envelope = client.run("which ministry fixes roads?").await.expect("flow call succeeds");
    assert_eq!(envelope.flatten(), vec!["Ministry of Transport handles road repair."]);
}

#[tokio::test]
async fn inquiry_retries_through_a_transient_flow_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lf/ws-test/api/v1/run/engagegov"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/lf/ws-test/api/v1/run/engagegov"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": [{"outputs": [{"results": {"message": {"text": "Filed."}}}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let outcome = pipeline_for(&config)
        .process_inquiry("broken streetlight on my street")
        .await
        .expect("second attempt should succeed");

    assert_eq!(outcome.response, "- Filed.");
    assert_eq!(outcome.ministry, "Ministry of Public Works");
}
