//! Page splitting for preview and export.
//!
//! The pipeline embeds [`PAGE_BREAK`] after every section; consumers derive
//! pages by splitting on it. Documents produced before the marker existed
//! have none, so those are split before each `<h2` instead.

/// Literal sentinel separating pages. Consumers match it byte-for-byte.
pub const PAGE_BREAK: &str = "<!--PAGE_BREAK-->";

/// Split a generated document into pages, dropping blank ones.
pub fn paginate(content: &str) -> Vec<&str> {
    let pieces: Vec<&str> = if content.contains(PAGE_BREAK) {
        content.split(PAGE_BREAK).collect()
    } else {
        split_before_headings(content)
    };

    pieces
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect()
}

fn split_before_headings(content: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in content.match_indices("<h2") {
        if idx > start {
            pieces.push(&content[start..idx]);
        }
        start = idx;
    }
    pieces.push(&content[start..]);
    pieces
}
