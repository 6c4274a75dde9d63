//! Assembler: join sections into the final page-break-delimited document.

use crate::output::Section;
use crate::pages::PAGE_BREAK;
use crate::pipeline::postprocess::remove_standard_mentions;

/// Concatenate `pieces` in order with a marker between every pair.
///
/// Pieces already ending in a marker are not given a second one, so
/// splitting the result on [`PAGE_BREAK`] yields one entry per piece. The
/// combined text is then stripped of formatting-standard mentions.
pub fn assemble<'a>(pieces: impl IntoIterator<Item = &'a str>) -> String {
    let mut document = String::new();
    for piece in pieces {
        if !document.is_empty() && !document.trim_end().ends_with(PAGE_BREAK) {
            document.push('\n');
            document.push_str(PAGE_BREAK);
        }
        if !document.is_empty() {
            document.push('\n');
        }
        document.push_str(piece);
    }
    remove_standard_mentions(&document)
}

/// Assemble the TOC page followed by the generated sections.
pub fn assemble_paper(toc_html: &str, sections: &[Section]) -> String {
    assemble(std::iter::once(toc_html).chain(sections.iter().map(|s| s.html.as_str())))
}
