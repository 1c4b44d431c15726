use engagegov_core::config::{AppConfig, LogFormat};

use super::CommandResult;

/// Prints the effective configuration with secrets redacted.
pub fn run() -> CommandResult {
    match AppConfig::load(Default::default()) {
        Ok(config) => CommandResult::success(render(&config)),
        Err(error) => CommandResult::failure(error),
    }
}

fn render(config: &AppConfig) -> String {
    format!(
        "[flow]\n\
         base_url = {}\n\
         workspace_id = {}\n\
         endpoint = {}\n\
         app_token = <redacted>\n\
         \n\
         [ocr]\n\
         base_url = {}\n\
         api_key = {}\n\
         model = {}\n\
         max_image_bytes = {}\n\
         \n\
         [content]\n\
         base_url = {}\n\
         api_key = {}\n\
         model = {}\n\
         default_tone = {}\n\
         temperature = {}\n\
         max_tokens = {}\n\
         \n\
         [retry]\n\
         max_attempts = {}\n\
         base_delay_ms = {}\n\
         \n\
         [logging]\n\
         level = {}\n\
         format = {}",
        config.flow.base_url,
        config.flow.workspace_id,
        config.flow.endpoint,
        config.ocr.base_url,
        redact(config.ocr.api_key.is_some()),
        config.ocr.model,
        config.ocr.max_image_bytes,
        config.content.base_url,
        redact(config.content.api_key.is_some()),
        config.content.model,
        config.content.default_tone,
        config.content.temperature,
        config.content.max_tokens,
        config.retry.max_attempts,
        config.retry.base_delay_ms,
        config.logging.level,
        format_name(config.logging.format),
    )
}

fn redact(present: bool) -> &'static str {
    if present {
        "<redacted>"
    } else {
        "<unset>"
    }
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    }
}
