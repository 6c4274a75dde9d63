//! Word export: turn a generated paper into an HTML document Word opens as `.doc`.
//!
//! Word ignores HTML comments, so the page-break markers are replaced with
//! plain spacing and explicit Word page breaks are inserted before the
//! introduction, the first body chapter, the conclusion and the references.

use crate::error::PaperGenError;
use crate::generate::write_atomically;
use crate::output::GeneratedPaper;
use crate::pages::PAGE_BREAK;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// UTF-8 byte-order mark; without it Word guesses a legacy code page and
/// mangles accented characters.
const BOM: char = '\u{FEFF}';

const WORD_HEADER: &str = r#"<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>
<head>
<meta charset='utf-8'>
<title>Documento</title>
<style>
@page { size: A4; margin: 3cm 2cm 2cm 3cm; }
body { font-family: 'Times New Roman', Times, serif; line-height: 1.5; }
p, h1, h2, h3, h4, li { font-family: 'Times New Roman', Times, serif; }
p, li { text-align: justify; }
p { text-indent: 1.25cm; margin-top: 0; margin-bottom: 0; }
h1, h2, h3 { margin-top: 24pt; margin-bottom: 12pt; }
</style>
</head><body>"#;

const WORD_FOOTER: &str = "</body></html>";

const WORD_PAGE_BREAK: &str =
    r#"<br clear="all" style="page-break-before:always; mso-break-type:page-break" />"#;

/// Headings that start on a fresh Word page; only the first match of each is used.
static SECTION_HEADINGS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)<h2[^>]*>\s*(?:1\.\s*)?Introdução\s*</h2>").unwrap(),
        Regex::new(r"(?i)<h2[^>]*>\s*2\.\s*[^<]+</h2>").unwrap(),
        Regex::new(r"(?i)<h2[^>]*>\s*Conclusão\s*</h2>").unwrap(),
        Regex::new(r"(?i)<h2[^>]*>\s*Referências bibliográficas\s*</h2>").unwrap(),
    ]
});

/// Convert page-break markers into Word page breaks before the main sections.
pub fn format_for_word(content: &str) -> String {
    let mut formatted = content.replace(PAGE_BREAK, "<br><br>");
    for heading in SECTION_HEADINGS.iter() {
        formatted = heading
            .replacen(&formatted, 1, |caps: &regex::Captures| {
                format!("{WORD_PAGE_BREAK}{}", &caps[0])
            })
            .into_owned();
    }
    formatted
}

/// Full `.doc` payload for `paper`: BOM, Office header, body, footer.
pub fn to_word_html(paper: &GeneratedPaper) -> String {
    let body = format_for_word(&paper.content);
    let mut doc = String::with_capacity(WORD_HEADER.len() + body.len() + WORD_FOOTER.len() + 3);
    doc.push(BOM);
    doc.push_str(WORD_HEADER);
    doc.push_str(&body);
    doc.push_str(WORD_FOOTER);
    doc
}

/// Download name for a paper on `theme`: `Trabalho_<theme>.doc`, whitespace runs as `_`.
pub fn word_file_name(theme: &str) -> String {
    format!("Trabalho_{}.doc", theme.split_whitespace().collect::<Vec<_>>().join("_"))
}

/// Write the Word document for `paper` to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_word_document(
    paper: &GeneratedPaper,
    path: impl AsRef<Path>,
) -> Result<(), PaperGenError> {
    write_atomically(path.as_ref(), to_word_html(paper).as_bytes(), "doc.tmp").await
}
