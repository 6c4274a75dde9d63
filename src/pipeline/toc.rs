//! Table-of-contents estimator.
//!
//! Page numbers are estimated from word counts at [`WORDS_PER_PAGE`]. Page 1
//! is the table of contents itself, so the introduction starts on page 2.
//! Chapters are often shorter than a page, so their words are accumulated
//! and only rounded once all chapters have been counted.

use crate::output::{Section, SectionKind};
use crate::pipeline::postprocess::{count_words, sentence_case};
use crate::prompts::{CONCLUSION_HEADING, INTRODUCTION_HEADING, REFERENCES_HEADING, TOC_HEADING};
use html_escape::encode_text;
use std::fmt::Write;

/// Words that fit on one A4 page at 12pt Times New Roman, 1.5 spacing.
pub const WORDS_PER_PAGE: usize = 450;

/// Page where the introduction starts.
pub const FIRST_CONTENT_PAGE: usize = 2;

/// One table-of-contents row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub page: usize,
}

/// Rows in presentation order: introduction, chapters, conclusion, references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOfContents {
    pub entries: Vec<TocEntry>,
}

/// Pages a standalone section occupies: `ceil(words / 450)`, at least one.
fn standalone_pages(words: usize) -> usize {
    words.div_ceil(WORDS_PER_PAGE).max(1)
}

impl TableOfContents {
    /// Estimate starting pages for `sections`.
    ///
    /// Sections of kind [`SectionKind::Toc`] are ignored; the others are
    /// taken in the order given.
    pub fn estimate(sections: &[Section]) -> Self {
        let mut entries = Vec::with_capacity(sections.len());
        let mut page = FIRST_CONTENT_PAGE;
        let mut chapter_words = 0usize;
        let mut in_chapters = false;

        for section in sections {
            let words = count_words(&section.html);

            if in_chapters && !matches!(section.kind, SectionKind::Chapter { .. }) {
                page += chapter_words.div_ceil(WORDS_PER_PAGE);
                chapter_words = 0;
                in_chapters = false;
            }

            match &section.kind {
                SectionKind::Toc => {}
                SectionKind::Introduction => {
                    entries.push(TocEntry {
                        title: INTRODUCTION_HEADING.to_string(),
                        page,
                    });
                    page += standalone_pages(words);
                }
                SectionKind::Chapter { number, title } => {
                    in_chapters = true;
                    entries.push(TocEntry {
                        title: format!("{number}. {}", sentence_case(title)),
                        page: page + chapter_words / WORDS_PER_PAGE,
                    });
                    chapter_words += words;
                }
                SectionKind::Conclusion => {
                    entries.push(TocEntry {
                        title: CONCLUSION_HEADING.to_string(),
                        page,
                    });
                    page += standalone_pages(words);
                }
                SectionKind::References => {
                    entries.push(TocEntry {
                        title: REFERENCES_HEADING.to_string(),
                        page,
                    });
                    page += standalone_pages(words);
                }
            }
        }

        Self { entries }
    }

    /// Render the table-of-contents page (without the trailing marker).
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(256 + self.entries.len() * 192);
        html.push_str(
            "<div class=\"toc-page\" style=\"font-family: 'Times New Roman', serif; color: black;\">\n",
        );
        let _ = writeln!(
            html,
            "  <h2 style=\"text-align: center; margin-bottom: 40px;\">{TOC_HEADING}</h2>"
        );
        html.push_str(
            "  <table width=\"100%\" style=\"font-size: 12pt; line-height: 1.5; border-collapse: collapse; border: none;\">\n",
        );
        for entry in &self.entries {
            let _ = write!(
                html,
                "    <tr>\n      \
                 <td style=\"text-align: left; border: none; padding: 5px 0;\"><b>{}</b></td>\n      \
                 <td style=\"text-align: right; border: none; padding: 5px 0;\">{}</td>\n    \
                 </tr>\n",
                encode_text(&entry.title),
                entry.page
            );
        }
        html.push_str("  </table>\n</div>");
        html
    }
}
