//! CLI binary for papergen.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `PaperRequest` + `GenerationConfig`, drives the streaming API and writes
//! the result.

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use papergen::request::{AcademicLevel, GradeBand, LanguageVariant, WritingStyle};
use papergen::{
    generate_stream, word_file_name, write_word_document, GeneratedPaper, GenerationConfig,
    PaperRequest, PipelineEvent, SectionKind,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # 10-page university paper, HTML on stdout
  papergen --theme "O impacto do petróleo na economia angolana" --discipline Economia --pages 10

  # Write HTML and a Word document
  papergen --theme "A água em Angola" --discipline Geografia -o agua.html --doc agua.doc

  # Word document named after the theme (Trabalho_A_água_em_Angola.doc)
  papergen --theme "A água em Angola" --discipline Geografia -o agua.html --doc

  # Read the request from the JSON the order form produces
  papergen --request pedido.json --json > trabalho.json

  # Use a specific provider and model
  papergen --provider openai --model gpt-4.1-mini --theme "Ética" --discipline Filosofia

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
"#;

/// Generate academic papers with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "papergen",
    version,
    about = "Generate paginated academic papers (HTML / Word) with an LLM",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Paper theme; also the paper title.
    #[arg(long, required_unless_present = "request")]
    theme: Option<String>,

    /// Discipline the paper belongs to.
    #[arg(long, required_unless_present = "request")]
    discipline: Option<String>,

    /// Read the whole request from a JSON file instead of flags.
    #[arg(long, conflicts_with_all = ["theme", "discipline"])]
    request: Option<PathBuf>,

    /// Academic level.
    #[arg(long, value_enum, default_value = "university")]
    level: LevelArg,

    /// Target page count (1–50).
    #[arg(long, default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(1..=50))]
    pages: u32,

    /// Writing style.
    #[arg(long, value_enum, default_value = "normal")]
    style: StyleArg,

    /// Portuguese variant.
    #[arg(long, value_enum, default_value = "angola")]
    language: LanguageArg,

    /// Target grade band.
    #[arg(long, value_enum, default_value = "good")]
    grade: GradeArg,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "PAPERGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write a Word (.doc) document; without a path it is named
    /// `Trabalho_<theme>.doc` in the current directory.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    doc: Option<Option<PathBuf>>,

    /// LLM model ID.
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, …
    #[arg(long, env = "EDGEQUAKE_LLM_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PAPERGEN_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Attempts per call when rate-limited.
    #[arg(long, env = "PAPERGEN_MAX_ATTEMPTS", default_value_t = 5)]
    max_attempts: u32,

    /// Pause after each chapter, in milliseconds.
    #[arg(long, env = "PAPERGEN_CHAPTER_DELAY_MS", default_value_t = 1000)]
    chapter_delay_ms: u64,

    /// Per-call LLM timeout in seconds.
    #[arg(long, env = "PAPERGEN_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Output structured JSON (GeneratedPaper) instead of HTML.
    #[arg(long)]
    json: bool,

    /// Disable progress output.
    #[arg(long, env = "PAPERGEN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPERGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPERGEN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Secondary,
    HighSchool,
    Technical,
    University,
}

impl From<LevelArg> for AcademicLevel {
    fn from(v: LevelArg) -> Self {
        match v {
            LevelArg::Secondary => AcademicLevel::Secondary,
            LevelArg::HighSchool => AcademicLevel::HighSchool,
            LevelArg::Technical => AcademicLevel::Technical,
            LevelArg::University => AcademicLevel::University,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Simple,
    Normal,
    AverageStudent,
}

impl From<StyleArg> for WritingStyle {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::Simple => WritingStyle::Simple,
            StyleArg::Normal => WritingStyle::Normal,
            StyleArg::AverageStudent => WritingStyle::AverageStudent,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    Angola,
    Brazil,
    Portugal,
}

impl From<LanguageArg> for LanguageVariant {
    fn from(v: LanguageArg) -> Self {
        match v {
            LanguageArg::Angola => LanguageVariant::Angola,
            LanguageArg::Brazil => LanguageVariant::Brazil,
            LanguageArg::Portugal => LanguageVariant::Portugal,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum GradeArg {
    /// 10-14
    Pass,
    /// 14-17
    Good,
    /// 17-20
    Excellent,
}

impl From<GradeArg> for GradeBand {
    fn from(v: GradeArg) -> Self {
        match v {
            GradeArg::Pass => GradeBand::Pass,
            GradeArg::Good => GradeBand::Good,
            GradeArg::Excellent => GradeBand::Excellent,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let request = build_request(&cli).await?;
    let config = build_config(&cli)?;
    let doc_path = resolve_doc_path(&cli.doc, &request.theme);

    // ── Run pipeline ─────────────────────────────────────────────────────
    let paper = run_with_progress(&request, &config, show_progress).await?;

    if let Some(ref doc_path) = doc_path {
        write_word_document(&paper, doc_path)
            .await
            .context("Failed to write Word document")?;
    }

    let payload = if cli.json {
        serde_json::to_string_pretty(&paper).context("Failed to serialise paper")?
    } else {
        paper.content.clone()
    };

    if let Some(ref output_path) = cli.output {
        tokio::fs::write(output_path, payload.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(payload.as_bytes())
            .context("Failed to write to stdout")?;
        if !payload.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} pages  {} words  {} calls ({} retries)  {}ms",
            green("✔"),
            paper.pages().len(),
            paper.stats.total_words,
            paper.stats.api_calls,
            paper.stats.retries,
            paper.stats.duration_ms,
        );
        if let Some(ref output_path) = cli.output {
            eprintln!("   → {}", bold(&output_path.display().to_string()));
        }
        if let Some(ref doc_path) = doc_path {
            eprintln!("   → {}", bold(&doc_path.display().to_string()));
        }
    }

    Ok(())
}

/// Consume the event stream, rendering a progress bar when enabled.
async fn run_with_progress(
    request: &PaperRequest,
    config: &GenerationConfig,
    show_progress: bool,
) -> Result<GeneratedPaper> {
    let mut events = generate_stream(request, config)
        .await
        .context("Generation failed")?;

    let bar = if show_progress {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos}/{len}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    while let Some(event) = events.next().await {
        match event {
            Ok(PipelineEvent::Started { total_steps }) => {
                if let Some(ref bar) = bar {
                    bar.set_length(total_steps as u64);
                }
            }
            Ok(PipelineEvent::Status(status)) => {
                if let Some(ref bar) = bar {
                    bar.set_message(status);
                }
            }
            Ok(PipelineEvent::SectionReady { kind, words }) => {
                if let Some(ref bar) = bar {
                    bar.inc(1);
                    if !matches!(kind, SectionKind::Toc) {
                        bar.println(format!(
                            "  {} {:<48} {}",
                            green("✓"),
                            kind.to_string(),
                            dim(&format!("{words:>5} words"))
                        ));
                    }
                }
            }
            Ok(PipelineEvent::Completed(paper)) => {
                if let Some(ref bar) = bar {
                    bar.finish_and_clear();
                }
                return Ok(*paper);
            }
            Err(e) => {
                if let Some(ref bar) = bar {
                    bar.abandon();
                }
                return Err(e).context("Generation failed");
            }
        }
    }

    anyhow::bail!("Generation stream ended without a result")
}

/// Build the request from `--request` JSON or from flags.
async fn build_request(cli: &Cli) -> Result<PaperRequest> {
    if let Some(ref path) = cli.request {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read request from {:?}", path))?;
        let request: PaperRequest = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid request JSON in {:?}", path))?;
        if !cli.quiet {
            eprintln!(
                "{} {}",
                cyan("◆"),
                bold(&format!("{} ({} pages)", request.theme, request.pages))
            );
        }
        return Ok(request);
    }

    Ok(PaperRequest {
        theme: cli.theme.clone().unwrap_or_default(),
        discipline: cli.discipline.clone().unwrap_or_default(),
        level: cli.level.into(),
        pages: cli.pages,
        style: cli.style.into(),
        language: cli.language.into(),
        grade: cli.grade.into(),
    })
}

/// `--doc PATH` as given; bare `--doc` falls back to the theme-derived name.
fn resolve_doc_path(doc: &Option<Option<PathBuf>>, theme: &str) -> Option<PathBuf> {
    doc.as_ref()
        .map(|path| path.clone().unwrap_or_else(|| PathBuf::from(word_file_name(theme))))
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .temperature(cli.temperature)
        .max_attempts(cli.max_attempts)
        .chapter_delay_ms(cli.chapter_delay_ms)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }

    builder.build().context("Invalid configuration")
}
