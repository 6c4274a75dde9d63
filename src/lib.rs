//! # papergen
//!
//! Generate paginated academic papers from a sequence of LLM calls.
//!
//! A student describes the paper they need (theme, discipline, academic
//! level, page count, style, Portuguese variant, target grade); the pipeline
//! asks the model for a chapter outline, writes every section with its own
//! prompt, estimates a table of contents from word counts and assembles one
//! HTML document whose pages are delimited by [`PAGE_BREAK`].
//!
//! ## Pipeline Overview
//!
//! ```text
//! PaperRequest
//!  │
//!  ├─ 1. Outline       max(pages - 3, 2) chapter titles, padded if short
//!  ├─ 2. Introduction  ≈ one page
//!  ├─ 3. Chapters      one call per chapter, 1 s pause between calls
//!  ├─ 4. Conclusion    ≈ one page
//!  ├─ 5. References    10–15 entries, preamble stripped
//!  ├─ 6. Summary       page numbers estimated at 450 words/page
//!  └─ 7. Assembly      TOC + sections, joined by <!--PAGE_BREAK-->
//! ```
//!
//! Every call goes through a retry wrapper that backs off on rate-limit
//! errors (2 s, 4 s, 8 s, 16 s) and fails fast on anything else.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use papergen::{run_pipeline, GenerationConfig, PaperRequest};
//! use papergen::request::{AcademicLevel, GradeBand, LanguageVariant, WritingStyle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let request = PaperRequest {
//!         theme: "O impacto do petróleo na economia angolana".into(),
//!         discipline: "Economia".into(),
//!         level: AcademicLevel::University,
//!         pages: 10,
//!         style: WritingStyle::Normal,
//!         language: LanguageVariant::Angola,
//!         grade: GradeBand::Good,
//!     };
//!     let html = run_pipeline(&request, &GenerationConfig::default()).await?;
//!     println!("{html}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `papergen` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod output;
pub mod pages;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod request;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder, DEFAULT_MODEL};
pub use error::{GenerateError, PaperGenError};
pub use export::{to_word_html, word_file_name, write_word_document};
pub use generate::{generate_paper, generate_paper_sync, generate_paper_to_file, run_pipeline};
pub use output::{GeneratedPaper, GenerationStats, Section, SectionKind};
pub use pages::{paginate, PAGE_BREAK};
pub use pipeline::client::{LlmGenerator, TextGenerator};
pub use pipeline::retry::{generate_with_retry, RetryPolicy};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use request::PaperRequest;
pub use stream::{generate_stream, PipelineEvent, PipelineStream};
