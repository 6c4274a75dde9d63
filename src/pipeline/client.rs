//! The generative-text seam and its edgequake-llm implementation.
//!
//! The pipeline only ever needs `generate(model, prompt) -> text`.
//! [`TextGenerator`] captures exactly that, with failures already classified
//! into [`GenerateError`] so the retry wrapper never inspects message text.
//! [`LlmGenerator`] adapts any [`LLMProvider`] to it.

use crate::config::GenerationConfig;
use crate::error::{GenerateError, PaperGenError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, LlmError, ProviderFactory};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// One generative-text operation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` with `model`.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError>;
}

/// [`TextGenerator`] backed by an edgequake-llm provider.
///
/// Providers are bound to a model when they are created, so `model` is only
/// recorded in traces here; [`resolve_generator`] creates the provider with
/// [`GenerationConfig::model`].
pub struct LlmGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
    timeout_secs: u64,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
            timeout_secs: config.api_timeout_secs,
        }
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        let messages = vec![ChatMessage::user(prompt)];
        let call = self.provider.chat(&messages, Some(&self.options));

        match timeout(Duration::from_secs(self.timeout_secs), call).await {
            Ok(Ok(response)) => {
                debug!(
                    "{}: {} input tokens, {} output tokens",
                    model, response.prompt_tokens, response.completion_tokens
                );
                Ok(response.content)
            }
            Ok(Err(e)) => Err(classify(e, self.timeout_secs)),
            Err(_) => Err(GenerateError::Timeout {
                secs: self.timeout_secs,
            }),
        }
    }
}

/// Map a provider error onto [`GenerateError`].
///
/// Structured variants decide on their own. Only the untyped `ApiError` and
/// `ProviderError` payloads fall back to message inspection, since some
/// providers report quota rejections there.
fn classify(err: LlmError, timeout_secs: u64) -> GenerateError {
    match err {
        LlmError::RateLimited(message) => GenerateError::RateLimited { message },
        LlmError::Timeout => GenerateError::Timeout { secs: timeout_secs },
        LlmError::ApiError(message) | LlmError::ProviderError(message) => {
            GenerateError::from_client_message(message)
        }
        other => GenerateError::Api {
            message: other.to_string(),
        },
    }
}

/// Build `CompletionOptions` from the generation config.
fn build_options(config: &GenerationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Resolve the text generator, from most-specific to least-specific.
///
/// 1. **Pre-built generator** (`config.generator`), used as-is.
/// 2. **Pre-built provider** (`config.provider`), wrapped in [`LlmGenerator`].
/// 3. **Named provider** (`config.provider_name`) created with `config.model`
///    through [`ProviderFactory::create_llm_provider`], which reads the
///    matching API key from the environment.
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 5. **Gemini key** (`GEMINI_API_KEY`): the default model is a Gemini model.
/// 6. **Full auto-detection** ([`ProviderFactory::from_env`]).
///
/// Any failure is a [`PaperGenError::ProviderNotConfigured`], raised before a
/// single generation call is made.
pub fn resolve_generator(
    config: &GenerationConfig,
) -> Result<Arc<dyn TextGenerator>, PaperGenError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    let provider = resolve_provider(config)?;
    Ok(Arc::new(LlmGenerator::new(provider, config)))
}

fn resolve_provider(config: &GenerationConfig) -> Result<Arc<dyn LLMProvider>, PaperGenError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, &config.model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            return create_provider("gemini", &config.model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PaperGenError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, PaperGenError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PaperGenError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
