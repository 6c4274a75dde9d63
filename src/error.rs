//! Error types for the papergen library.
//!
//! Two error types reflect two distinct layers:
//!
//! * [`GenerateError`] — the outcome of **one** generative-text call,
//!   already classified by the client adapter. The retry wrapper inspects
//!   the variant (not the message) to decide whether to back off.
//!
//! * [`PaperGenError`] — **Fatal**: the pipeline run is aborted. Returned as
//!   `Err(PaperGenError)` from [`crate::generate::run_pipeline`] and friends.
//!   No partial document is ever returned alongside it.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the papergen library.
#[derive(Debug, Error)]
pub enum PaperGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The paper request failed validation (empty theme, page count out of range…).
    #[error("Invalid paper request: {0}")]
    InvalidRequest(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured provider could not be created (missing API key etc.).
    ///
    /// Raised before any generation call is attempted.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// A generation call failed with an error that is not retried.
    #[error(transparent)]
    Generation(#[from] GenerateError),

    /// Every attempt was rate-limited; the API is saturated.
    #[error("System overloaded: still rate-limited after {attempts} attempts. Try again shortly.\nLast error: {last_error}")]
    Overloaded { attempts: u32, last_error: String },

    /// The run was cancelled through the configured cancellation token.
    #[error("Paper generation cancelled before step '{step}'")]
    Cancelled { step: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaperGenError {
    /// `true` when the run failed because the API kept rejecting requests for quota.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, PaperGenError::Overloaded { .. })
    }
}

/// Failure of a single generative-text call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// HTTP 429 / quota exhausted. Eligible for retry with backoff.
    #[error("Rate limited by the generative-text API: {message}")]
    RateLimited { message: String },

    /// Any other API or transport failure. Never retried.
    #[error("Generative-text API error: {message}")]
    Api { message: String },

    /// The call did not complete within the configured timeout. Never retried.
    #[error("Generative-text call timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Substrings that mark a client error as quota/throughput related.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "429",
    "quota",
    "resource_exhausted",
    "rate limit",
    "ratelimit",
];

impl GenerateError {
    /// Classify an error message coming out of a provider client.
    ///
    /// Provider crates surface rate limiting in different shapes (status
    /// code in the message, Google's `RESOURCE_EXHAUSTED`, "quota exceeded");
    /// the check is case-insensitive.
    pub fn from_client_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m)) {
            GenerateError::RateLimited { message }
        } else {
            GenerateError::Api { message }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GenerateError::RateLimited { .. })
    }
}
