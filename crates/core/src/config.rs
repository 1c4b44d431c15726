use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub flow: FlowConfig,
    pub ocr: OcrConfig,
    pub content: ContentConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

/// Hosted flow-execution endpoint (the routed LLM backend).
#[derive(Clone, Debug)]
pub struct FlowConfig {
    pub base_url: String,
    pub workspace_id: String,
    pub endpoint: String,
    pub app_token: SecretString,
}

/// Image-to-text extraction service.
#[derive(Clone, Debug)]
pub struct OcrConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub max_image_bytes: u64,
}

/// Content-generation service (OpenAI-compatible chat completions).
#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub default_tone: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub flow_base_url: Option<String>,
    pub flow_endpoint: Option<String>,
    pub flow_app_token: Option<String>,
    pub ocr_base_url: Option<String>,
    pub content_base_url: Option<String>,
    pub retry_max_attempts: Option<u32>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            flow: FlowConfig {
                base_url: "https://api.langflow.astra.datastax.com".to_string(),
                workspace_id: String::new(),
                endpoint: "engagegov".to_string(),
                app_token: String::new().into(),
            },
            ocr: OcrConfig {
                base_url: "https://api.ocr.space".to_string(),
                api_key: None,
                model: "ocr-latest".to_string(),
                max_image_bytes: 200 * 1024 * 1024,
            },
            content: ContentConfig {
                base_url: "https://api.x.ai/v1".to_string(),
                api_key: None,
                model: "grok-beta".to_string(),
                default_tone: "professional".to_string(),
                temperature: 0.7,
                max_tokens: 500,
            },
            retry: RetryConfig { max_attempts: 5, base_delay_ms: 1000 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("engagegov.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(flow) = patch.flow {
            if let Some(base_url) = flow.base_url {
                self.flow.base_url = base_url;
            }
            if let Some(workspace_id) = flow.workspace_id {
                self.flow.workspace_id = workspace_id;
            }
            if let Some(endpoint) = flow.endpoint {
                self.flow.endpoint = endpoint;
            }
            if let Some(app_token_value) = flow.app_token {
                self.flow.app_token = secret_value(app_token_value);
            }
        }

        if let Some(ocr) = patch.ocr {
            if let Some(base_url) = ocr.base_url {
                self.ocr.base_url = base_url;
            }
            if let Some(api_key_value) = ocr.api_key {
                self.ocr.api_key = Some(secret_value(api_key_value));
            }
            if let Some(model) = ocr.model {
                self.ocr.model = model;
            }
            if let Some(max_image_bytes) = ocr.max_image_bytes {
                self.ocr.max_image_bytes = max_image_bytes;
            }
        }

        if let Some(content) = patch.content {
            if let Some(base_url) = content.base_url {
                self.content.base_url = base_url;
            }
            if let Some(api_key_value) = content.api_key {
                self.content.api_key = Some(secret_value(api_key_value));
            }
            if let Some(model) = content.model {
                self.content.model = model;
            }
            if let Some(default_tone) = content.default_tone {
                self.content.default_tone = default_tone;
            }
            if let Some(temperature) = content.temperature {
                self.content.temperature = temperature;
            }
            if let Some(max_tokens) = content.max_tokens {
                self.content.max_tokens = max_tokens;
            }
        }

        if let Some(retry) = patch.retry {
            if let Some(max_attempts) = retry.max_attempts {
                self.retry.max_attempts = max_attempts;
            }
            if let Some(base_delay_ms) = retry.base_delay_ms {
                self.retry.base_delay_ms = base_delay_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ENGAGEGOV_FLOW_BASE_URL") {
            self.flow.base_url = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_FLOW_WORKSPACE_ID") {
            self.flow.workspace_id = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_FLOW_ENDPOINT") {
            self.flow.endpoint = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_FLOW_APP_TOKEN") {
            self.flow.app_token = secret_value(value);
        }

        if let Some(value) = read_env("ENGAGEGOV_OCR_BASE_URL") {
            self.ocr.base_url = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_OCR_API_KEY") {
            self.ocr.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("ENGAGEGOV_OCR_MODEL") {
            self.ocr.model = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_OCR_MAX_IMAGE_BYTES") {
            self.ocr.max_image_bytes = parse_u64("ENGAGEGOV_OCR_MAX_IMAGE_BYTES", &value)?;
        }

        if let Some(value) = read_env("ENGAGEGOV_CONTENT_BASE_URL") {
            self.content.base_url = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_CONTENT_API_KEY") {
            self.content.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("ENGAGEGOV_CONTENT_MODEL") {
            self.content.model = value;
        }
        if let Some(value) = read_env("ENGAGEGOV_CONTENT_TEMPERATURE") {
            self.content.temperature = parse_f64("ENGAGEGOV_CONTENT_TEMPERATURE", &value)?;
        }
        if let Some(value) = read_env("ENGAGEGOV_CONTENT_MAX_TOKENS") {
            self.content.max_tokens = parse_u32("ENGAGEGOV_CONTENT_MAX_TOKENS", &value)?;
        }

        if let Some(value) = read_env("ENGAGEGOV_RETRY_MAX_ATTEMPTS") {
            self.retry.max_attempts = parse_u32("ENGAGEGOV_RETRY_MAX_ATTEMPTS", &value)?;
        }
        if let Some(value) = read_env("ENGAGEGOV_RETRY_BASE_DELAY_MS") {
            self.retry.base_delay_ms = parse_u64("ENGAGEGOV_RETRY_BASE_DELAY_MS", &value)?;
        }

        let log_level =
            read_env("ENGAGEGOV_LOGGING_LEVEL").or_else(|| read_env("ENGAGEGOV_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ENGAGEGOV_LOGGING_FORMAT").or_else(|| read_env("ENGAGEGOV_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(flow_base_url) = overrides.flow_base_url {
            self.flow.base_url = flow_base_url;
        }
        if let Some(flow_endpoint) = overrides.flow_endpoint {
            self.flow.endpoint = flow_endpoint;
        }
        if let Some(flow_app_token) = overrides.flow_app_token {
            self.flow.app_token = secret_value(flow_app_token);
        }
        if let Some(ocr_base_url) = overrides.ocr_base_url {
            self.ocr.base_url = ocr_base_url;
        }
        if let Some(content_base_url) = overrides.content_base_url {
            self.content.base_url = content_base_url;
        }
        if let Some(retry_max_attempts) = overrides.retry_max_attempts {
            self.retry.max_attempts = retry_max_attempts;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_flow(&self.flow)?;
        validate_ocr(&self.ocr)?;
        validate_content(&self.content)?;
        validate_retry(&self.retry)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("engagegov.toml"), PathBuf::from("config/engagegov.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_base_url(section: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{section}.base_url must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_flow(flow: &FlowConfig) -> Result<(), ConfigError> {
    validate_base_url("flow", &flow.base_url)?;

    if flow.endpoint.trim().is_empty() {
        return Err(ConfigError::Validation("flow.endpoint must not be empty".to_string()));
    }

    if flow.app_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "flow.app_token is required to call the flow-execution endpoint".to_string(),
        ));
    }

    Ok(())
}

fn validate_ocr(ocr: &OcrConfig) -> Result<(), ConfigError> {
    validate_base_url("ocr", &ocr.base_url)?;

    if ocr.max_image_bytes == 0 {
        return Err(ConfigError::Validation(
            "ocr.max_image_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_content(content: &ContentConfig) -> Result<(), ConfigError> {
    validate_base_url("content", &content.base_url)?;

    if !(0.0..=1.0).contains(&content.temperature) {
        return Err(ConfigError::Validation(
            "content.temperature must be in range 0.0..=1.0".to_string(),
        ));
    }

    if content.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "content.max_tokens must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry(retry: &RetryConfig) -> Result<(), ConfigError> {
    if retry.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "retry.max_attempts must be greater than zero".to_string(),
        ));
    }

    if retry.base_delay_ms == 0 {
        return Err(ConfigError::Validation(
            "retry.base_delay_ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    flow: Option<FlowPatch>,
    ocr: Option<OcrPatch>,
    content: Option<ContentPatch>,
    retry: Option<RetryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct FlowPatch {
    base_url: Option<String>,
    workspace_id: Option<String>,
    endpoint: Option<String>,
    app_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OcrPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_image_bytes: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    default_tone: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RetryPatch {
    max_attempts: Option<u32>,
    base_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
