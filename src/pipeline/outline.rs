//! Outline step: derive the body-chapter titles.

use crate::error::PaperGenError;
use crate::pipeline::client::TextGenerator;
use crate::pipeline::retry::{generate_with_retry, Generated, RetryPolicy};
use crate::prompts::{outline_prompt, OUTLINE_DELIMITER};
use crate::request::PaperRequest;
use tracing::{debug, info};

/// Chapter titles in presentation order, plus the retries spent getting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub chapters: Vec<String>,
    pub retries: u32,
}

/// Ask the model for `request.core_pages()` chapter titles.
///
/// Short answers are padded with placeholder titles; long answers are kept
/// as they are.
pub async fn generate_outline(
    generator: &dyn TextGenerator,
    model: &str,
    request: &PaperRequest,
    policy: &RetryPolicy,
) -> Result<Outline, PaperGenError> {
    let core_pages = request.core_pages();
    let prompt = outline_prompt(request, core_pages);
    let Generated { text, retries } = generate_with_retry(generator, model, &prompt, policy).await?;

    let mut chapters = parse_titles(&text);
    let returned = chapters.len();
    pad_titles(&mut chapters, core_pages, &request.theme);

    if returned < core_pages {
        info!(
            "Outline returned {} of {} titles; padded with placeholders",
            returned, core_pages
        );
    } else if returned > core_pages {
        debug!("Outline returned {} titles for {} requested", returned, core_pages);
    }

    Ok(Outline { chapters, retries })
}

/// Split on the delimiter, trim, drop empty entries.
pub fn parse_titles(text: &str) -> Vec<String> {
    text.split(OUTLINE_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append `Análise Aprofundada N: <theme>` placeholders until `target` titles exist.
///
/// `N` counts the placeholders themselves, starting at 1.
pub fn pad_titles(chapters: &mut Vec<String>, target: usize, theme: &str) {
    let missing = target.saturating_sub(chapters.len());
    chapters.extend((1..=missing).map(|n| format!("Análise Aprofundada {n}: {theme}")));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_list() {
        let titles = parse_titles(" História do tema; Conceitos Fundamentais ;;Impacto Social;\n");
        assert_eq!(
            titles,
            vec!["História do tema", "Conceitos Fundamentais", "Impacto Social"]
        );
    }

    #[test]
    fn empty_answer_parses_to_nothing() {
        assert!(parse_titles("").is_empty());
        assert!(parse_titles(" ; ; ").is_empty());
    }

    #[test]
    fn pads_missing_titles() {
        let mut titles = vec!["Contexto".to_string()];
        pad_titles(&mut titles, 3, "Petróleo");
        assert_eq!(
            titles,
            vec![
                "Contexto",
                "Análise Aprofundada 1: Petróleo",
                "Análise Aprofundada 2: Petróleo"
            ]
        );
    }

    #[test]
    fn never_truncates_extra_titles() {
        let mut titles: Vec<String> = (0..5).map(|i| format!("T{i}")).collect();
        pad_titles(&mut titles, 2, "x");
        assert_eq!(titles.len(), 5);
    }
}
