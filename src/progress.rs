//! Progress-callback trait for pipeline events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GenerationConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves from one section to the next.
//!
//! The status strings passed to [`GenerationProgressCallback::on_status`] are
//! user-facing (Portuguese) and meant to be shown verbatim in a UI.
//!
//! # Example
//!
//! ```rust
//! use papergen::{GenerationConfig, ProgressCallback};
//! use std::sync::Arc;
//!
//! // Any `Fn(&str)` closure receives the status strings.
//! let cb: ProgressCallback = Arc::new(|status: &str| eprintln!("{status}"));
//!
//! let config = GenerationConfig::builder()
//!     .progress_callback(cb)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::SectionKind;
use std::sync::Arc;

/// Called by the pipeline as it generates each section.
///
/// Implementations must be `Send + Sync`: the streaming API runs the
/// pipeline on a spawned task. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once the outline is known, before the introduction.
    ///
    /// # Arguments
    /// * `total_steps` — intro + chapters + conclusion + references + TOC; one
    ///   [`on_section_complete`](Self::on_section_complete) call follows per step.
    fn on_pipeline_start(&self, total_steps: usize) {
        let _ = total_steps;
    }

    /// Called before each step with a human-readable status line.
    fn on_status(&self, status: &str) {
        let _ = status;
    }

    /// Called after a section has been generated and cleaned.
    ///
    /// # Arguments
    /// * `kind`  — which section was produced
    /// * `words` — its word count after stripping markup
    fn on_section_complete(&self, kind: &SectionKind, words: usize) {
        let _ = (kind, words);
    }

    /// Called once the document has been assembled.
    fn on_pipeline_complete(&self, total_words: usize) {
        let _ = total_words;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

impl<F> GenerationProgressCallback for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_status(&self, status: &str) {
        self(status)
    }
}

/// Convenience alias matching the type stored in [`crate::config::GenerationConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
