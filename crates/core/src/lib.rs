pub mod config;
pub mod envelope;
pub mod errors;
pub mod routing;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use envelope::FlowEnvelope;
pub use errors::{InvokeError, PipelineError};
pub use routing::{classify, MinistryRouter, RoutingRule, DEFAULT_MINISTRY, MINISTRY_RULES};
