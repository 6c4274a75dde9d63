//! Post-processing: deterministic cleanup of model-generated HTML.
//!
//! Even well-prompted models wrap HTML in ```` ```html ```` fences, chat
//! before the first heading ("Aqui está a lista…") or forget the trailing
//! page-break marker. Each rule here is a pure `&str → String` function so
//! it can be tested in isolation.

use crate::pages::PAGE_BREAK;
use once_cell::sync::Lazy;
use regex::Regex;

// ── Rule 1: Strip code fences ────────────────────────────────────────────────

/// Any fence marker, with or without a language tag (```` ```html ````, ```` ``` ````).
static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").unwrap());

/// Remove every code-fence marker and trim surrounding whitespace.
pub fn clean_section(input: &str) -> String {
    RE_FENCE.replace_all(input, "").trim().to_string()
}

// ── Rule 2: Drop conversational preamble ─────────────────────────────────────

/// Discard everything before the first `<h2`; unchanged when there is none.
pub fn strip_preamble(input: &str) -> String {
    match input.find("<h2") {
        Some(idx) if idx > 0 => input[idx..].to_string(),
        _ => input.to_string(),
    }
}

// ── Rule 3: Exactly one trailing marker ──────────────────────────────────────

/// Remove trailing markers/whitespace and append exactly one marker.
pub fn terminate_with_marker(input: &str) -> String {
    let mut body = input.trim_end();
    while let Some(stripped) = body.strip_suffix(PAGE_BREAK) {
        body = stripped.trim_end();
    }
    format!("{body}\n{PAGE_BREAK}")
}

// ── Rule 4: Remove formatting-standard mentions ──────────────────────────────

/// Papers follow the general PALOP conventions; models still drop in the
/// Brazilian standard's acronym, which is removed wherever it appears.
static RE_ABNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)abnt").unwrap());

pub fn remove_standard_mentions(input: &str) -> String {
    RE_ABNT.replace_all(input, "").into_owned()
}

// ── Text helpers ─────────────────────────────────────────────────────────────

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// Remove all markup tags, keeping their text content.
pub fn strip_tags(html: &str) -> String {
    RE_TAG.replace_all(html, "").into_owned()
}

/// Whitespace-delimited tokens after stripping markup.
pub fn count_words(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// First character upper-case, the rest lower-case ("IMPACTO Social" → "Impacto social").
pub fn sentence_case(title: &str) -> String {
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
