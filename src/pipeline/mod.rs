//! Pipeline stages for paper generation.
//!
//! Each submodule implements one step; [`crate::generate`] sequences them.
//!
//! ## Data Flow
//!
//! ```text
//! outline ──▶ sections ──▶ toc ──▶ assemble
//! (titles)    (intro, chapters, conclusion, references)
//! ```
//!
//! 1. [`client`]   — the `generate(model, prompt)` seam and the edgequake-llm adapter
//! 2. [`retry`]    — backoff on rate-limited calls; the only place that sleeps
//!    between attempts
//! 3. [`outline`]  — body-chapter titles, padded to `core_pages`
//! 4. [`sections`] — one call per section, cleaned and marker-terminated
//! 5. [`toc`]      — page-number estimation from word counts
//! 6. [`assemble`] — concatenation with page-break markers
//! 7. [`postprocess`] — deterministic text rules shared by the steps above

pub mod assemble;
pub mod client;
pub mod outline;
pub mod postprocess;
pub mod retry;
pub mod sections;
pub mod toc;
