//! Section generators: introduction, chapters, conclusion and references.
//!
//! Each generator issues exactly one call through
//! [`generate_with_retry`], then cleans the answer:
//! fences stripped, (references only) preamble dropped, and exactly one
//! trailing page-break marker.

use crate::error::PaperGenError;
use crate::output::{Section, SectionKind};
use crate::pipeline::client::TextGenerator;
use crate::pipeline::postprocess::{
    clean_section, sentence_case, strip_preamble, terminate_with_marker,
};
use crate::pipeline::retry::{generate_with_retry, Generated, RetryPolicy};
use crate::prompts;
use crate::request::PaperRequest;

/// A cleaned section plus the retries spent producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSection {
    pub section: Section,
    pub retries: u32,
}

/// Printed label of the chapter at `index` (0-based); the introduction is 1.
pub fn chapter_number(index: usize) -> usize {
    index + 2
}

/// Shared context for the section calls of one run.
pub struct SectionWriter<'a> {
    pub generator: &'a dyn TextGenerator,
    pub model: &'a str,
    pub request: &'a PaperRequest,
    pub policy: RetryPolicy,
}

impl SectionWriter<'_> {
    pub async fn introduction(&self) -> Result<GeneratedSection, PaperGenError> {
        let prompt = prompts::introduction_prompt(self.request);
        self.write(SectionKind::Introduction, &prompt, false).await
    }

    /// Chapter `index` (0-based) titled `title`.
    pub async fn chapter(
        &self,
        index: usize,
        title: &str,
    ) -> Result<GeneratedSection, PaperGenError> {
        let number = chapter_number(index);
        let prompt = prompts::chapter_prompt(self.request, title, &sentence_case(title), number);
        let kind = SectionKind::Chapter {
            number,
            title: title.to_string(),
        };
        self.write(kind, &prompt, false).await
    }

    pub async fn conclusion(&self) -> Result<GeneratedSection, PaperGenError> {
        let prompt = prompts::conclusion_prompt(self.request);
        self.write(SectionKind::Conclusion, &prompt, false).await
    }

    /// References; any text before the first heading is discarded.
    pub async fn references(&self) -> Result<GeneratedSection, PaperGenError> {
        let prompt = prompts::references_prompt(self.request);
        self.write(SectionKind::References, &prompt, true).await
    }

    async fn write(
        &self,
        kind: SectionKind,
        prompt: &str,
        drop_preamble: bool,
    ) -> Result<GeneratedSection, PaperGenError> {
        let Generated { text, retries } =
            generate_with_retry(self.generator, self.model, prompt, &self.policy).await?;

        let mut html = clean_section(&text);
        if drop_preamble {
            html = strip_preamble(&html);
        }

        Ok(GeneratedSection {
            section: Section {
                kind,
                html: terminate_with_marker(&html),
            },
            retries,
        })
    }
}
