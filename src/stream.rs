//! Streaming generation API: emit events as the pipeline advances.
//!
//! Generating a 20-page paper takes minutes. [`generate_stream`] runs the
//! pipeline on a spawned task and yields [`PipelineEvent`]s as each step
//! starts and each section completes, ending with the finished paper.
//! Unlike the eager [`crate::generate::generate_paper`], callers can show
//! progress without implementing a callback trait.

use crate::config::GenerationConfig;
use crate::error::PaperGenError;
use crate::generate::generate_with;
use crate::output::{GeneratedPaper, SectionKind};
use crate::pipeline::client::resolve_generator;
use crate::progress::GenerationProgressCallback;
use crate::request::PaperRequest;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::{info, warn};

/// One observable step of a streaming run.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Sent once the outline is known: the number of `SectionReady` events to expect.
    Started { total_steps: usize },
    /// Human-readable status line, emitted before each step.
    Status(String),
    /// A section was generated and cleaned.
    SectionReady { kind: SectionKind, words: usize },
    /// The run finished; always the last item of a successful stream.
    Completed(Box<GeneratedPaper>),
}

/// A boxed stream of pipeline events.
///
/// A failed run yields a single `Err` as its final item. Dropping the stream
/// stops the run.
pub type PipelineStream = Pin<Box<dyn Stream<Item = Result<PipelineEvent, PaperGenError>> + Send>>;

/// Generate a paper, streaming events as the pipeline advances.
///
/// # Returns
/// - `Ok(PipelineStream)` — events in pipeline order
/// - `Err(PaperGenError)` — the request is invalid or no provider could be
///   configured; nothing was sent to the API
pub async fn generate_stream(
    request: &PaperRequest,
    config: &GenerationConfig,
) -> Result<PipelineStream, PaperGenError> {
    request.validate()?;
    let generator = resolve_generator(config)?;
    info!("Starting streaming generation: {}", request.theme);

    let (tx, rx) = mpsc::unbounded_channel();
    let request = request.clone();
    let config = config.clone();

    tokio::spawn(async move {
        let forward = ChannelProgress {
            tx: tx.clone(),
            inner: config.progress_callback.clone(),
        };
        let run = generate_with(generator.as_ref(), &request, &config, &forward);
        // Dropping the stream drops the run, including any in-flight call.
        let item = tokio::select! {
            biased;
            _ = tx.closed() => {
                info!("Stream dropped; stopping generation of '{}'", request.theme);
                return;
            }
            result = run => result.map(|paper| PipelineEvent::Completed(Box::new(paper))),
        };
        if tx.send(item).is_err() {
            warn!("Stream receiver dropped before generation finished");
        }
    });

    Ok(Box::pin(UnboundedReceiverStream::new(rx)))
}

/// Forwards callback events into the stream channel, and to the configured
/// callback when there is one.
struct ChannelProgress {
    tx: mpsc::UnboundedSender<Result<PipelineEvent, PaperGenError>>,
    inner: Option<crate::progress::ProgressCallback>,
}

impl ChannelProgress {
    fn emit(&self, event: PipelineEvent) {
        // Fails only once the caller has dropped the stream.
        let _ = self.tx.send(Ok(event));
    }
}

impl GenerationProgressCallback for ChannelProgress {
    fn on_pipeline_start(&self, total_steps: usize) {
        self.emit(PipelineEvent::Started { total_steps });
        if let Some(ref cb) = self.inner {
            cb.on_pipeline_start(total_steps);
        }
    }

    fn on_status(&self, status: &str) {
        self.emit(PipelineEvent::Status(status.to_string()));
        if let Some(ref cb) = self.inner {
            cb.on_status(status);
        }
    }

    fn on_section_complete(&self, kind: &SectionKind, words: usize) {
        self.emit(PipelineEvent::SectionReady {
            kind: kind.clone(),
            words,
        });
        if let Some(ref cb) = self.inner {
            cb.on_section_complete(kind, words);
        }
    }

    fn on_pipeline_complete(&self, total_words: usize) {
        if let Some(ref cb) = self.inner {
            cb.on_pipeline_complete(total_words);
        }
    }
}
