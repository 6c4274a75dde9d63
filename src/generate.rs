//! Paper-generation entry points.
//!
//! This module sequences the pipeline stages: outline → introduction →
//! chapters → conclusion → references → table of contents → assembly.
//! Steps run strictly one after another; the only suspension points are the
//! generation calls, the backoff sleeps inside the retry wrapper and the
//! fixed pause after every chapter.
//!
//! Any step failure aborts the whole run. Sections generated before the
//! failure are dropped with it; callers never see a partial document.

use crate::config::GenerationConfig;
use crate::error::PaperGenError;
use crate::output::{GeneratedPaper, GenerationStats, Section, SectionKind};
use crate::pipeline::assemble::assemble_paper;
use crate::pipeline::client::{resolve_generator, TextGenerator};
use crate::pipeline::outline::generate_outline;
use crate::pipeline::postprocess::count_words;
use crate::pipeline::sections::{chapter_number, GeneratedSection, SectionWriter};
use crate::pipeline::toc::TableOfContents;
use crate::progress::{GenerationProgressCallback, NoopProgressCallback};
use crate::request::PaperRequest;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

/// Generate a paper and return the assembled HTML document.
///
/// The string is the page-break-delimited document described in
/// [`crate::pages`]. Use [`generate_paper`] to also get the request,
/// timestamp and statistics.
///
/// # Errors
/// - [`PaperGenError::InvalidRequest`] before any call if the request is invalid
/// - [`PaperGenError::ProviderNotConfigured`] before any call if no provider can be built
/// - any step failure (see [`crate::pipeline::retry::generate_with_retry`])
pub async fn run_pipeline(
    request: &PaperRequest,
    config: &GenerationConfig,
) -> Result<String, PaperGenError> {
    Ok(generate_paper(request, config).await?.content)
}

/// Generate a paper.
///
/// This is the primary entry point for the library.
///
/// # Example
/// ```rust,no_run
/// use papergen::{generate_paper, GenerationConfig, PaperRequest};
/// use papergen::request::{AcademicLevel, GradeBand, LanguageVariant, WritingStyle};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = PaperRequest {
///     theme: "A água em Angola".into(),
///     discipline: "Geografia".into(),
///     level: AcademicLevel::University,
///     pages: 8,
///     style: WritingStyle::Normal,
///     language: LanguageVariant::Angola,
///     grade: GradeBand::Good,
/// };
/// let paper = generate_paper(&request, &GenerationConfig::default()).await?;
/// println!("{} pages", paper.pages().len());
/// # Ok(())
/// # }
/// ```
pub async fn generate_paper(
    request: &PaperRequest,
    config: &GenerationConfig,
) -> Result<GeneratedPaper, PaperGenError> {
    request.validate()?;
    let generator = resolve_generator(config)?;

    match config.progress_callback.as_deref() {
        Some(cb) => generate_with(generator.as_ref(), request, config, cb).await,
        None => generate_with(generator.as_ref(), request, config, &NoopProgressCallback).await,
    }
}

/// Generate a paper and write the HTML document directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn generate_paper_to_file(
    request: &PaperRequest,
    output_path: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<GenerationStats, PaperGenError> {
    let paper = generate_paper(request, config).await?;
    write_atomically(output_path.as_ref(), paper.content.as_bytes(), "html.tmp").await?;
    Ok(paper.stats)
}

/// Synchronous wrapper around [`generate_paper`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_paper_sync(
    request: &PaperRequest,
    config: &GenerationConfig,
) -> Result<GeneratedPaper, PaperGenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PaperGenError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate_paper(request, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run every step with an already-resolved generator.
pub(crate) async fn generate_with(
    generator: &dyn TextGenerator,
    request: &PaperRequest,
    config: &GenerationConfig,
    progress: &dyn GenerationProgressCallback,
) -> Result<GeneratedPaper, PaperGenError> {
    let start = Instant::now();
    let model = config.model.as_str();
    let policy = config.retry_policy();
    info!(
        "Generating {}-page paper on '{}' with {}",
        request.pages, request.theme, model
    );

    let mut stats = GenerationStats::default();

    // ── Step 1: Outline ──────────────────────────────────────────────────
    checkpoint(config, "outline")?;
    let status = format!("Planeando estrutura para {} páginas...", request.pages);
    announce(progress, &status);
    let outline = generate_outline(generator, model, request, &policy).await?;
    stats.api_calls += 1;
    stats.retries += outline.retries as usize;
    let chapters = outline.chapters;
    stats.chapter_count = chapters.len();
    debug!("Outline: {:?}", chapters);
    progress.on_pipeline_start(chapters.len() + 4);

    let writer = SectionWriter {
        generator,
        model,
        request,
        policy,
    };
    let mut sections: Vec<Section> = Vec::with_capacity(chapters.len() + 3);

    // ── Step 2: Introduction ─────────────────────────────────────────────
    checkpoint(config, "introduction")?;
    announce(progress, "Escrevendo Introdução...");
    let intro = writer.introduction().await?;
    record(&mut sections, &mut stats, progress, intro);

    // ── Step 3: Chapters ─────────────────────────────────────────────────
    for (index, title) in chapters.iter().enumerate() {
        checkpoint(config, title)?;
        let status = format!(
            "Escrevendo Cap. {}/{}: {}...",
            chapter_number(index),
            chapters.len() + 3,
            title
        );
        announce(progress, &status);
        let chapter = writer.chapter(index, title).await?;
        record(&mut sections, &mut stats, progress, chapter);

        sleep(Duration::from_millis(config.chapter_delay_ms)).await;
    }

    // ── Step 4: Conclusion ───────────────────────────────────────────────
    checkpoint(config, "conclusion")?;
    announce(progress, "Escrevendo Conclusão...");
    let conclusion = writer.conclusion().await?;
    record(&mut sections, &mut stats, progress, conclusion);

    // ── Step 5: References ───────────────────────────────────────────────
    checkpoint(config, "references")?;
    announce(progress, "Gerando Referências Bibliográficas...");
    let references = writer.references().await?;
    record(&mut sections, &mut stats, progress, references);

    // ── Step 6: Table of contents ────────────────────────────────────────
    checkpoint(config, "table of contents")?;
    announce(progress, "Gerando Sumário...");
    let toc = TableOfContents::estimate(&sections);
    progress.on_section_complete(&SectionKind::Toc, 0);

    // ── Step 7: Assemble ─────────────────────────────────────────────────
    let content = assemble_paper(&toc.to_html(), &sections);
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Paper complete: {} chapters, {} words, {} calls ({} retries), {}ms",
        stats.chapter_count, stats.total_words, stats.api_calls, stats.retries, stats.duration_ms
    );
    progress.on_pipeline_complete(stats.total_words);

    Ok(GeneratedPaper {
        title: request.theme.clone(),
        content,
        request: request.clone(),
        created_at: Utc::now(),
        stats,
    })
}

fn announce(progress: &dyn GenerationProgressCallback, status: &str) {
    info!("{}", status);
    progress.on_status(status);
}

fn record(
    sections: &mut Vec<Section>,
    stats: &mut GenerationStats,
    progress: &dyn GenerationProgressCallback,
    generated: GeneratedSection,
) {
    let words = count_words(&generated.section.html);
    debug!("Generated {}: {} words", generated.section.kind, words);
    stats.api_calls += 1;
    stats.retries += generated.retries as usize;
    stats.total_words += words;
    progress.on_section_complete(&generated.section.kind, words);
    sections.push(generated.section);
}

fn checkpoint(config: &GenerationConfig, step: &str) -> Result<(), PaperGenError> {
    match config.cancellation {
        Some(ref token) if token.is_cancelled() => Err(PaperGenError::Cancelled {
            step: step.to_string(),
        }),
        _ => Ok(()),
    }
}

pub(crate) async fn write_atomically(
    path: &Path,
    bytes: &[u8],
    tmp_extension: &str,
) -> Result<(), PaperGenError> {
    let write_err = |e| PaperGenError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let tmp_path = path.with_extension(tmp_extension);
    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}
