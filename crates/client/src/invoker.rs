//! Resilient invocation of one external HTTP call.
//!
//! Policy: connect-level failures are surfaced immediately (fast feedback
//! beats masking a dead endpoint). HTTP 429 honors the server-supplied
//! `Retry-After` delay and does not advance the backoff exponent. Any other
//! non-2xx status or transport error is retried with exponential backoff up
//! to the attempt budget, after which the last error is surfaced inside
//! `RetriesExhausted`.

use std::time::Duration;

use engagegov_core::config::RetryConfig;
use engagegov_core::InvokeError;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Largest backoff exponent applied before the multiplier saturates.
const MAX_BACKOFF_EXPONENT: u32 = 16;

#[derive(Clone, Debug)]
pub struct ResilientInvoker {
    max_attempts: u32,
    base_delay: Duration,
}

impl ResilientInvoker {
    pub fn new(retry: &RetryConfig) -> Self {
        Self {
            max_attempts: retry.max_attempts.max(1),
            base_delay: Duration::from_millis(retry.base_delay_ms),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sends the request built by `build`, decoding the 2xx body as JSON.
    ///
    /// `build` is called once per attempt so the request body does not have
    /// to be cloneable.
    pub async fn invoke<F>(&self, build: F) -> Result<Value, InvokeError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut backoff_exponent = 0u32;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let error = match self.attempt(build()).await {
                Ok(value) => return Ok(value),
                Err(error) if !error.is_transient() => return Err(error),
                Err(error) => error,
            };

            if attempt >= self.max_attempts {
                warn!(
                    event_name = "invoker.retries_exhausted",
                    attempts = attempt,
                    last_error = %error,
                    "attempt budget exhausted"
                );
                return Err(InvokeError::RetriesExhausted { attempts: attempt, last: Box::new(error) });
            }

            if let Some(retry_after_secs) = error.retry_after_secs() {
                // Rate limits honor the server delay without consuming a
                // backoff step.
                debug!(
                    event_name = "invoker.rate_limited",
                    attempt,
                    retry_after_secs,
                    "honoring server-requested delay"
                );
                tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
                continue;
            }

            let delay = self.backoff_delay(backoff_exponent);
            debug!(
                event_name = "invoker.backoff",
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            backoff_exponent += 1;
        }
    }

    fn backoff_delay(&self, exponent: u32) -> Duration {
        let multiplier = 1u32 << exponent.min(MAX_BACKOFF_EXPONENT);
        self.base_delay.saturating_mul(multiplier)
    }

    async fn attempt(&self, request: RequestBuilder) -> Result<Value, InvokeError> {
        let response = request.send().await.map_err(classify_transport_error)?;
        decode_response(response).await
    }
}

fn classify_transport_error(error: reqwest::Error) -> InvokeError {
    if error.is_connect() {
        return InvokeError::Network(error.to_string());
    }
    // Timeouts and mid-flight transport failures count toward the retry
    // budget like any other remote error; status 0 marks the absence of an
    // HTTP status line.
    InvokeError::Remote { status: 0, message: error.to_string() }
}

async fn decode_response(response: Response) -> Result<Value, InvokeError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = retry_after_seconds(&response);
        return Err(InvokeError::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(InvokeError::Remote { status: status.as_u16(), message: truncate(&message) });
    }

    response
        .json::<Value>()
        .await
        .map_err(|error| InvokeError::MalformedResponse(error.to_string()))
}

fn retry_after_seconds(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
        .max(1)
}

fn truncate(message: &str) -> String {
    const LIMIT: usize = 256;
    if message.len() <= LIMIT {
        message.to_string()
    } else {
        let mut end = LIMIT;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &message[..end])
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engagegov_core::config::RetryConfig;

    use super::ResilientInvoker;

    #[test]
    fn backoff_doubles_from_the_base_delay() {
        let invoker = ResilientInvoker::new(&RetryConfig { max_attempts: 5, base_delay_ms: 100 });
        assert_eq!(invoker.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(invoker.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(invoker.backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let invoker =
            ResilientInvoker::new(&RetryConfig { max_attempts: 5, base_delay_ms: u64::MAX / 2 });
        let delay = invoker.backoff_delay(40);
        assert!(delay >= Duration::from_millis(u64::MAX / 2));
    }

    #[test]
    fn attempt_budget_never_drops_below_one() {
        let invoker = ResilientInvoker::new(&RetryConfig { max_attempts: 0, base_delay_ms: 1 });
        assert_eq!(invoker.max_attempts(), 1);
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(1000);
        let truncated = super::truncate(&long);
        assert!(truncated.len() < 300);
        assert!(truncated.ends_with("..."));
    }
}
