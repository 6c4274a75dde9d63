//! End-to-end pipeline runs against a scripted generator.
//!
//! Time is paused so the pause after each chapter costs nothing.

mod scripted_llm;

use futures::StreamExt;
use once_cell::sync::Lazy;
use papergen::{
    generate_paper, generate_paper_sync, generate_paper_to_file, generate_stream, paginate,
    run_pipeline, write_word_document, GenerateError, GenerationConfig, PaperGenError,
    PipelineEvent, ProgressCallback, SectionKind, TextGenerator,
};
use regex::Regex;
use scripted_llm::{request, ScriptedConfig, ScriptedGenerator, Step};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration, Instant};
use tokio_util::sync::CancellationToken;

static TOC_PAGE_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"text-align: right;[^>]*>(\d+)</td>"#).unwrap());

fn config_for(generator: &Arc<ScriptedGenerator>) -> GenerationConfig {
    GenerationConfig::builder()
        .generator(generator.clone() as Arc<dyn TextGenerator>)
        .build()
        .unwrap()
}

fn scripted(config: ScriptedConfig) -> Arc<ScriptedGenerator> {
    Arc::new(ScriptedGenerator::new(config))
}

#[tokio::test(start_paused = true)]
async fn ten_page_paper_has_eleven_clean_pages() {
    let generator = scripted(ScriptedConfig::default());
    let html = run_pipeline(&request(10), &config_for(&generator))
        .await
        .unwrap();

    let pages = paginate(&html);
    // Summary, introduction, 7 chapters, conclusion, references.
    assert_eq!(pages.len(), 11);
    assert!(pages[0].contains("Sumário"));
    assert!(pages[1].contains("<h2>1. Introdução</h2>"));
    assert!(pages[10].trim_start().starts_with("<h2>Referências bibliográficas</h2>"));

    assert!(!html.contains("```"));
    assert!(!html.to_lowercase().contains("abnt"));
    assert!(!html.contains("Claro!"));

    let toc_pages: Vec<usize> = TOC_PAGE_CELL
        .captures_iter(pages[0])
        .map(|c| c[1].parse().unwrap())
        .collect();
    assert_eq!(toc_pages.len(), 10);
    assert_eq!(toc_pages[0], 2);
    assert!(toc_pages.windows(2).all(|w| w[0] <= w[1]), "{toc_pages:?}");

    assert_eq!(
        generator.steps(),
        [
            vec![Step::Outline, Step::Introduction],
            vec![Step::Chapter; 7],
            vec![Step::Conclusion, Step::References],
        ]
        .concat()
    );
}

#[tokio::test(start_paused = true)]
async fn statuses_follow_pipeline_order() {
    let generator = scripted(ScriptedConfig::default());
    let statuses = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = statuses.clone();
    let callback: ProgressCallback =
        Arc::new(move |s: &str| sink.lock().unwrap().push(s.to_string()));
    let config = GenerationConfig::builder()
        .generator(generator.clone() as Arc<dyn TextGenerator>)
        .progress_callback(callback)
        .build()
        .unwrap();

    generate_paper(&request(6), &config).await.unwrap();

    let statuses = statuses.lock().unwrap().clone();
    assert_eq!(
        statuses,
        vec![
            "Planeando estrutura para 6 páginas...",
            "Escrevendo Introdução...",
            "Escrevendo Cap. 2/6: Contexto histórico...",
            "Escrevendo Cap. 3/6: Conceitos fundamentais...",
            "Escrevendo Cap. 4/6: Impacto social...",
            "Escrevendo Conclusão...",
            "Gerando Referências Bibliográficas...",
            "Gerando Sumário...",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn short_outline_is_padded_with_placeholders() {
    let generator = scripted(ScriptedConfig {
        outline: "Contexto histórico".into(),
        ..Default::default()
    });
    let paper = generate_paper(&request(6), &config_for(&generator))
        .await
        .unwrap();

    assert_eq!(paper.stats.chapter_count, 3);
    let chapter_prompts: Vec<String> = generator
        .prompts()
        .into_iter()
        .filter(|p| Step::of(p) == Step::Chapter)
        .collect();
    assert_eq!(chapter_prompts.len(), 3);
    assert!(chapter_prompts[0].contains("Contexto histórico"));
    assert!(chapter_prompts[1].contains("Análise Aprofundada 1: O impacto do petróleo"));
    assert!(chapter_prompts[2].contains("Análise Aprofundada 2: O impacto do petróleo"));
}

#[tokio::test(start_paused = true)]
async fn long_outline_is_kept_whole() {
    let generator = scripted(ScriptedConfig {
        outline: "Um; Dois; Três; Quatro; Cinco".into(),
        ..Default::default()
    });
    let paper = generate_paper(&request(4), &config_for(&generator))
        .await
        .unwrap();

    assert_eq!(paper.stats.chapter_count, 5);
    assert_eq!(paginate(&paper.content).len(), 9);
}

#[tokio::test(start_paused = true)]
async fn chapter_failure_aborts_the_run() {
    let generator = scripted(ScriptedConfig {
        fail_step: Some((
            Step::Chapter,
            GenerateError::Api {
                message: "500 internal".into(),
            },
        )),
        ..Default::default()
    });

    let err = generate_paper(&request(10), &config_for(&generator))
        .await
        .unwrap_err();

    assert!(matches!(err, PaperGenError::Generation(GenerateError::Api { .. })));
    assert_eq!(
        generator.steps(),
        vec![Step::Outline, Step::Introduction, Step::Chapter]
    );
}

#[tokio::test(start_paused = true)]
async fn rate_limits_are_counted_in_stats() {
    let generator = scripted(ScriptedConfig {
        leading_failures: vec![GenerateError::RateLimited {
            message: "quota exceeded".into(),
        }],
        ..Default::default()
    });

    let paper = generate_paper(&request(6), &config_for(&generator))
        .await
        .unwrap();

    assert_eq!(paper.stats.retries, 1);
    // outline, introduction, 3 chapters, conclusion, references
    assert_eq!(paper.stats.api_calls, 7);
    assert_eq!(generator.calls(), 8);
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_stops_before_any_call() {
    let generator = scripted(ScriptedConfig::default());
    let token = CancellationToken::new();
    token.cancel();
    let config = GenerationConfig::builder()
        .generator(generator.clone() as Arc<dyn TextGenerator>)
        .cancellation(token)
        .build()
        .unwrap();

    let err = generate_paper(&request(10), &config).await.unwrap_err();

    match err {
        PaperGenError::Cancelled { step } => assert_eq!(step, "outline"),
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn invalid_request_is_rejected_up_front() {
    let generator = scripted(ScriptedConfig::default());
    let mut req = request(10);
    req.theme = "   ".into();

    let err = generate_paper(&req, &config_for(&generator))
        .await
        .unwrap_err();

    assert!(matches!(err, PaperGenError::InvalidRequest(_)));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn stream_ends_with_completed_paper() {
    let generator = scripted(ScriptedConfig::default());
    let mut stream = generate_stream(&request(6), &config_for(&generator))
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Some(item) = stream.next().await {
        events.push(item.unwrap());
    }

    assert!(matches!(events[0], PipelineEvent::Status(_)));
    assert!(matches!(events[1], PipelineEvent::Started { total_steps: 7 }));
    let ready: Vec<&SectionKind> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::SectionReady { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(ready.len(), 7);
    assert_eq!(*ready[0], SectionKind::Introduction);
    assert_eq!(*ready[6], SectionKind::Toc);

    match events.last() {
        Some(PipelineEvent::Completed(paper)) => {
            assert_eq!(paper.stats.chapter_count, 3);
            assert_eq!(paper.pages().len(), 7);
        }
        other => panic!("expected Completed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn started_counts_every_section_of_a_long_outline() {
    let generator = scripted(ScriptedConfig {
        outline: "Um; Dois; Três; Quatro; Cinco".into(),
        ..Default::default()
    });
    let stream = generate_stream(&request(4), &config_for(&generator))
        .await
        .unwrap();

    let events: Vec<PipelineEvent> = stream.map(Result::unwrap).collect().await;
    let started = events.iter().find_map(|e| match e {
        PipelineEvent::Started { total_steps } => Some(*total_steps),
        _ => None,
    });
    let ready = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::SectionReady { .. }))
        .count();
    assert_eq!(started, Some(9));
    assert_eq!(ready, 9);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_stream_stops_generation() {
    let generator = scripted(ScriptedConfig::default());
    let mut stream = generate_stream(&request(20), &config_for(&generator))
        .await
        .unwrap();

    assert!(stream.next().await.is_some());
    let calls_at_drop = generator.calls();
    drop(stream);
    sleep(Duration::from_secs(120)).await;

    assert!(calls_at_drop < 21, "run finished before the drop");
    assert_eq!(generator.calls(), calls_at_drop);
}

#[tokio::test(start_paused = true)]
async fn stream_reports_failure_as_last_item() {
    let generator = scripted(ScriptedConfig {
        fail_step: Some((
            Step::References,
            GenerateError::Api {
                message: "400 bad request".into(),
            },
        )),
        ..Default::default()
    });
    let stream = generate_stream(&request(6), &config_for(&generator))
        .await
        .unwrap();

    let items: Vec<_> = stream.collect().await;
    assert!(items[..items.len() - 1].iter().all(Result::is_ok));
    assert!(matches!(
        items.last(),
        Some(Err(PaperGenError::Generation(GenerateError::Api { .. })))
    ));
}

#[tokio::test(start_paused = true)]
async fn word_document_is_written_with_bom() {
    let generator = scripted(ScriptedConfig::default());
    let paper = generate_paper(&request(6), &config_for(&generator))
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("trabalho.doc");
    write_word_document(&paper, &path).await.unwrap();

    let doc = std::fs::read_to_string(&path).unwrap();
    assert!(doc.starts_with('\u{FEFF}'));
    assert!(doc.contains("urn:schemas-microsoft-com:office:word"));
    assert!(!doc.contains("<!--PAGE_BREAK-->"));
    assert!(doc.contains("mso-break-type:page-break"));
    assert!(doc.ends_with("</body></html>"));
}

#[tokio::test(start_paused = true)]
async fn pauses_after_every_chapter() {
    let generator = scripted(ScriptedConfig::default());
    let start = Instant::now();

    let paper = generate_paper(&request(6), &config_for(&generator))
        .await
        .unwrap();

    // 3 chapters at the default 1000ms; no other sleeps without rate limits.
    assert_eq!(paper.stats.chapter_count, 3);
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3100),
        "elapsed {elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn paper_is_written_to_file_without_leftovers() {
    let generator = scripted(ScriptedConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trabalho.html");

    let stats = generate_paper_to_file(&request(6), &path, &config_for(&generator))
        .await
        .unwrap();

    assert_eq!(stats.chapter_count, 3);
    let html = std::fs::read_to_string(&path).unwrap();
    assert_eq!(paginate(&html).len(), 7);
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("trabalho.html")]);
}

#[test]
fn sync_wrapper_runs_the_pipeline() {
    let generator = scripted(ScriptedConfig::default());
    let config = GenerationConfig::builder()
        .generator(generator.clone() as Arc<dyn TextGenerator>)
        .chapter_delay_ms(0)
        .build()
        .unwrap();

    let paper = generate_paper_sync(&request(6), &config).unwrap();

    assert_eq!(paper.title, "O impacto do petróleo na economia angolana");
    assert_eq!(paper.pages().len(), 7);
    assert_eq!(generator.calls(), 7);
}
