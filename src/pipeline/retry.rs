//! Retrying wrapper around one generation call.
//!
//! ## Retry Strategy
//!
//! Only [`GenerateError::RateLimited`] is retried. Quota rejections clear up
//! after a pause; anything else (bad key, malformed request, timeout) will
//! fail the same way again, so it propagates immediately. The wait starts at
//! `initial_backoff_ms` and doubles after every rate-limited attempt: with
//! the defaults (2 s, 5 attempts) the sequence is 2 s → 4 s → 8 s → 16 s.

use crate::error::{GenerateError, PaperGenError};
use crate::pipeline::client::TextGenerator;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// How patiently to retry rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first rate-limited attempt, in ms.
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 2000,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, after `attempt` (1-based) was rate-limited.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        self.initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Successful call plus the number of rate-limited attempts before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub retries: u32,
}

/// Issue one generation request, retrying rate-limited attempts with backoff.
///
/// # Errors
/// - [`PaperGenError::Generation`] with the original [`GenerateError`] for any
///   non-rate-limit failure, after exactly one call.
/// - [`PaperGenError::Overloaded`] once `policy.max_attempts` calls were all
///   rate-limited.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    model: &str,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<Generated, PaperGenError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_err = String::new();

    for attempt in 1..=max_attempts {
        match generator.generate(model, prompt).await {
            Ok(text) => {
                debug!("{}: attempt {} succeeded ({} chars)", model, attempt, text.len());
                return Ok(Generated {
                    text,
                    retries: attempt - 1,
                });
            }
            Err(GenerateError::RateLimited { message }) => {
                last_err = message;
                if attempt < max_attempts {
                    let backoff = policy.backoff_ms(attempt);
                    warn!(
                        "{}: rate limited on attempt {}/{}, retrying after {}ms",
                        model, attempt, max_attempts, backoff
                    );
                    sleep(Duration::from_millis(backoff)).await;
                }
            }
            Err(e) => {
                warn!("{}: attempt {} failed — {}", model, attempt, e);
                return Err(e.into());
            }
        }
    }

    Err(PaperGenError::Overloaded {
        attempts: max_attempts,
        last_error: last_err,
    })
}
