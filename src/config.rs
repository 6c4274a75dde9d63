//! Configuration types for paper generation.
//!
//! All pipeline behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. The request says *what* to write;
//! the config says *how* to talk to the model (which provider, how patiently
//! to retry, how long to pause between chapters).

use crate::error::PaperGenError;
use crate::pipeline::client::TextGenerator;
use crate::pipeline::retry::RetryPolicy;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Configuration for a paper-generation run.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use papergen::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("gemini-2.5-flash")
///     .max_attempts(3)
///     .chapter_delay_ms(500)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// Model identifier passed with every generation call.
    pub model: String,

    /// LLM provider name (e.g. "gemini", "openai", "ollama").
    /// If None, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed text generator. Takes precedence over every provider
    /// setting; used to plug in caching layers or scripted generators in tests.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Sampling temperature. Default: 0.7.
    ///
    /// The pipeline writes prose rather than transcribing it, so it runs
    /// warmer than an extraction task would.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 8192.
    ///
    /// A 600-word chapter in HTML is roughly 1 500 tokens; the headroom
    /// covers models that overshoot the requested length.
    pub max_tokens: usize,

    /// Total attempts per call when the API rate-limits. Default: 5.
    pub max_attempts: u32,

    /// First backoff delay after a rate-limited attempt, in ms. Default: 2000.
    ///
    /// Doubles after each rate-limited attempt: 2 s → 4 s → 8 s → 16 s.
    pub initial_backoff_ms: u64,

    /// Fixed pause after every chapter call, in ms. Default: 1000.
    pub chapter_delay_ms: u64,

    /// Per-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Receives status strings and section events. Default: None.
    pub progress_callback: Option<ProgressCallback>,

    /// Checked between pipeline steps; cancelling aborts the run.
    pub cancellation: Option<CancellationToken>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider_name: None,
            provider: None,
            generator: None,
            temperature: 0.7,
            max_tokens: 8192,
            max_attempts: 5,
            initial_backoff_ms: 2000,
            chapter_delay_ms: 1000,
            api_timeout_secs: 120,
            progress_callback: None,
            cancellation: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_attempts", &self.max_attempts)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .field("chapter_delay_ms", &self.chapter_delay_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }

    /// Retry settings derived from this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff_ms: self.initial_backoff_ms,
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n;
        self
    }

    pub fn initial_backoff_ms(mut self, ms: u64) -> Self {
        self.config.initial_backoff_ms = ms;
        self
    }

    pub fn chapter_delay_ms(mut self, ms: u64) -> Self {
        self.config.chapter_delay_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.config.cancellation = Some(token);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, PaperGenError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PaperGenError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if c.max_attempts == 0 {
            return Err(PaperGenError::InvalidConfig(
                "max_attempts must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(PaperGenError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(PaperGenError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
