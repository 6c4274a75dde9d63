//! In-memory `TextGenerator` that answers each pipeline prompt with canned HTML.

#![allow(dead_code)]

use async_trait::async_trait;
use papergen::request::{AcademicLevel, GradeBand, LanguageVariant, WritingStyle};
use papergen::{GenerateError, PaperRequest, TextGenerator, PAGE_BREAK};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Which step a prompt belongs to, recognised from its wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Outline,
    Introduction,
    Chapter,
    Conclusion,
    References,
}

impl Step {
    pub fn of(prompt: &str) -> Step {
        if prompt.contains("títulos de capítulos") {
            Step::Outline
        } else if prompt.contains("INTRODUÇÃO") {
            Step::Introduction
        } else if prompt.contains("capítulo COMPLETO") {
            Step::Chapter
        } else if prompt.contains("CONCLUSÃO") {
            Step::Conclusion
        } else if prompt.contains("REFERÊNCIAS BIBLIOGRÁFICAS") {
            Step::References
        } else {
            panic!("unrecognised prompt: {prompt}")
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedConfig {
    /// Raw outline answer.
    pub outline: String,
    /// Words in every chapter body.
    pub chapter_words: usize,
    /// Errors returned (in order) by the first calls, before any answer.
    pub leading_failures: Vec<GenerateError>,
    /// Fail every call for this step with this error.
    pub fail_step: Option<(Step, GenerateError)>,
}

impl Default for ScriptedConfig {
    fn default() -> Self {
        Self {
            outline: "Contexto histórico; Conceitos fundamentais; Impacto social".into(),
            chapter_words: 620,
            leading_failures: Vec::new(),
            fail_step: None,
        }
    }
}

pub struct ScriptedGenerator {
    config: ScriptedConfig,
    failures: Mutex<VecDeque<GenerateError>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(config: ScriptedConfig) -> Self {
        Self {
            failures: Mutex::new(config.leading_failures.iter().cloned().collect()),
            prompts: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Every prompt received, including failed attempts.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.prompts().iter().map(|p| Step::of(p)).collect()
    }
}

pub fn words(n: usize) -> String {
    vec!["palavra"; n].join(" ")
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _model: &str, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        let step = Step::of(prompt);
        if let Some((fail, err)) = &self.config.fail_step {
            if *fail == step {
                return Err(err.clone());
            }
        }

        Ok(match step {
            Step::Outline => self.config.outline.clone(),
            Step::Introduction => format!(
                "```html\n<h2>1. Introdução</h2>\n<p>{}</p>\n{PAGE_BREAK}\n```",
                words(380)
            ),
            Step::Chapter => format!(
                "<h2>Capítulo</h2>\n<p>{}</p>\n{PAGE_BREAK}",
                words(self.config.chapter_words)
            ),
            Step::Conclusion => format!(
                "```\n<h2>Conclusão</h2>\n<p>Segundo a ABNT, {}</p>\n{PAGE_BREAK}\n```",
                words(310)
            ),
            Step::References => format!(
                "Claro! Aqui está a lista de referências:\n<h2>Referências bibliográficas</h2>\n<ul>{}</ul>",
                (1..=12)
                    .map(|i| format!("<li>AUTOR, {i}. Obra. Luanda: Editora, 20{i:02}.</li>"))
                    .collect::<String>()
            ),
        })
    }
}

pub fn request(pages: u32) -> PaperRequest {
    PaperRequest {
        theme: "O impacto do petróleo na economia angolana".into(),
        discipline: "Economia".into(),
        level: AcademicLevel::University,
        pages,
        style: WritingStyle::Normal,
        language: LanguageVariant::Angola,
        grade: GradeBand::Good,
    }
}
