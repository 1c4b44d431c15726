use std::path::Path;

use anyhow::Context;
use engagegov_client::{build_content_client, ContentRequest};

use super::CommandResult;
use crate::load_config_and_logging;

pub async fn run(
    prompt: &str,
    tone: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    out: Option<&Path>,
) -> CommandResult {
    match execute(prompt, tone, temperature, max_tokens, out).await {
        Ok(output) => CommandResult::success(output),
        Err(error) => CommandResult::failure(format!("{error:#}")),
    }
}

async fn execute(
    prompt: &str,
    tone: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    out: Option<&Path>,
) -> anyhow::Result<String> {
    let config = load_config_and_logging()?;
    let client = build_content_client(&config);

    let content = client
        .generate(&ContentRequest { prompt: prompt.to_string(), tone, temperature, max_tokens })
        .await
        .context("content generation failed")?;

    if let Some(path) = out {
        tokio::fs::write(path, &content)
            .await
            .with_context(|| format!("could not write `{}`", path.display()))?;
        return Ok(format!("Content successfully saved to {}", path.display()));
    }

    Ok(content)
}
