use thiserror::Error;

/// Failure taxonomy for one external-service invocation.
///
/// `RateLimited` and `Remote` are transient and resolved inside the invoker
/// up to the attempt budget; everything else surfaces to the caller as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvokeError {
    #[error("network failure: unable to reach the endpoint: {0}")]
    Network(String),
    #[error("rate limited by remote, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("remote returned status {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("response body could not be decoded: {0}")]
    MalformedResponse(String),
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<InvokeError> },
}

impl InvokeError {
    /// Transient errors are retried by the invoker; terminal ones are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Remote { .. })
    }

    /// Server-requested delay, present only for rate-limit failures.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

/// Failures of the report pipeline around the per-call taxonomy.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Invoke(#[from] InvokeError),
    #[error("uploaded image is {size_bytes} bytes, above the {limit_bytes} byte limit")]
    ImageTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("provide text input or upload a photo")]
    EmptyInput,
}

impl PipelineError {
    /// Message safe to show to the reporter, mirroring what the front end
    /// displays for each failure class.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invoke(InvokeError::Network(_)) => {
                "Network error: unable to reach the service. Please check your connection and try again.".to_string()
            }
            Self::Invoke(InvokeError::RetriesExhausted { .. }) => {
                "The service is busy right now. Please try again in a moment.".to_string()
            }
            Self::Invoke(_) => "An error occurred while contacting the service.".to_string(),
            Self::ImageTooLarge { limit_bytes, .. } => {
                let limit_mb = limit_bytes / (1024 * 1024);
                format!("File size exceeds {limit_mb}MB. Please upload a smaller file.")
            }
            Self::EmptyInput => "Please provide text input or upload a photo.".to_string(),
        }
    }
}
