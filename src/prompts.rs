//! Prompts for every generation step.
//!
//! All prompt text lives here so the pipeline modules only deal with
//! sequencing, retry and cleanup. The prompts are written in Portuguese
//! because the papers are; headings requested here ("1. Introdução",
//! "Conclusão", "Referências bibliográficas") are the same strings the
//! Word export looks for.

use crate::pages::PAGE_BREAK;
use crate::request::PaperRequest;

/// Heading text of the introduction section.
pub const INTRODUCTION_HEADING: &str = "1. Introdução";
/// Heading text of the conclusion section.
pub const CONCLUSION_HEADING: &str = "Conclusão";
/// Heading text of the references section.
pub const REFERENCES_HEADING: &str = "Referências bibliográficas";
/// Heading of the table of contents page.
pub const TOC_HEADING: &str = "Sumário";

/// Separator the outline prompt asks the model to use between titles.
pub const OUTLINE_DELIMITER: char = ';';

/// Ask for exactly `core_pages` body-chapter titles on one line.
pub fn outline_prompt(request: &PaperRequest, core_pages: usize) -> String {
    format!(
        r#"Atue como um professor universitário.
O aluno precisa de um trabalho de {pages} páginas sobre "{theme}" ({discipline}).
Nível académico: {level}. A profundidade e complexidade dos capítulos devem estar adequadas a este nível.

Liste EXATAMENTE {core_pages} títulos de capítulos para o DESENVOLVIMENTO do trabalho.
NÃO inclua "Introdução", "Conclusão" ou "Referências". Apenas o miolo do trabalho.
Os títulos devem ser académicos e progressivos.

Retorne APENAS a lista de títulos separados por ponto e vírgula ({delim}).
Exemplo: História do tema{delim} Conceitos Fundamentais{delim} Análise de Casos{delim} Impacto Social"#,
        pages = request.pages,
        theme = request.theme,
        discipline = request.discipline,
        level = request.level,
        delim = OUTLINE_DELIMITER,
    )
}

/// One-page introduction, ≈350–400 words.
pub fn introduction_prompt(request: &PaperRequest) -> String {
    format!(
        r#"Escreva a INTRODUÇÃO para um trabalho académico sobre "{theme}".
Nível académico: {level}. Estilo: {style}.
A linguagem, profundidade e complexidade devem ser estritamente adequadas a este nível académico.

Diretrizes:
- O texto deve ocupar APENAS UMA PÁGINA (aprox. 350 a 400 palavras).
- Não seja demasiado extenso, mas preencha visualmente a página.
- Comece DIRETAMENTE com <h2>{heading}</h2>.
- Fale sobre a contextualização, problema, justificativa e objetivos.
- Use <p> para parágrafos. Não use markdown, apenas HTML.
- Use linguagem formal ({language}).
- Adicione {PAGE_BREAK} no final."#,
        theme = request.theme,
        level = request.level,
        style = request.style,
        language = request.language,
        heading = INTRODUCTION_HEADING,
    )
}

/// One full A4 page for chapter `number`, at least 600 words.
///
/// `heading_title` is the chapter title already in sentence case.
pub fn chapter_prompt(
    request: &PaperRequest,
    title: &str,
    heading_title: &str,
    number: usize,
) -> String {
    format!(
        r#"Escreva um capítulo COMPLETO e EXTENSO sobre: "{title}".
Este é o capítulo {number} de um trabalho sobre "{theme}".
Nível académico: {level}. A linguagem, profundidade e complexidade devem ser estritamente adequadas a este nível.
Estilo: {style}. Nota pretendida: {grade} valores.

OBJETIVO: ENCHER UMA PÁGINA INTEIRA (A4).

Diretrizes:
- Comece com <h2>{number}. {heading_title}</h2>.
- Escreva de forma detalhada, com qualidade académica.
- Adote o ESTILO ACADÉMICO GERAL DOS PALOP.
- Defina conceitos, dê exemplos históricos, cite autores, explore causas e consequências.
- Use linguagem formal ({language}).
- Mínimo 600 palavras.
- Formato HTML (<p>, <ul>, <blockquote>).
- Adicione {PAGE_BREAK} no final do texto."#,
        theme = request.theme,
        level = request.level,
        style = request.style,
        grade = request.grade,
        language = request.language,
    )
}

/// One-page conclusion, ≈300–350 words.
pub fn conclusion_prompt(request: &PaperRequest) -> String {
    format!(
        r#"Escreva a CONCLUSÃO para o trabalho sobre "{theme}".
Nível académico: {level}. A linguagem e profundidade devem ser adequadas a este nível.

Diretrizes:
- Comece com <h2>{heading}</h2>.
- O texto deve ocupar APENAS UMA PÁGINA (aprox. 300 a 350 palavras).
- Sintetize os pontos principais abordados nos capítulos anteriores.
- Use linguagem formal ({language}).
- Formato HTML.
- Adicione {PAGE_BREAK} no final."#,
        theme = request.theme,
        level = request.level,
        language = request.language,
        heading = CONCLUSION_HEADING,
    )
}

/// Bibliography of 10–15 entries, HTML only.
pub fn references_prompt(request: &PaperRequest) -> String {
    format!(
        r#"Crie uma lista de REFERÊNCIAS BIBLIOGRÁFICAS para o tema "{theme}".
Nível académico: {level}. O tipo de fontes (livros, artigos científicos, etc.) deve ser adequado a este nível.

Diretrizes:
- Retorne APENAS o código HTML das referências. NÃO inclua nenhum texto introdutório ou de conclusão (ex: "Aqui está a lista...").
- Comece diretamente com <h2>{heading}</h2>.
- Gere pelo menos 10 a 15 referências seguindo as NORMAS GERAIS DOS PALOP.
- Formato HTML (use <ul> e <li> ou <p> com recuo)."#,
        theme = request.theme,
        level = request.level,
        heading = REFERENCES_HEADING,
    )
}
