//! The paper request submitted by a student.
//!
//! A [`PaperRequest`] fully determines every prompt the pipeline sends, so it
//! is treated as immutable once the run starts. The enumerations serialise to
//! the exact labels shown in the order form; those same labels are
//! interpolated into the prompts.

use crate::error::PaperGenError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest accepted page count.
pub const MIN_PAGES: u32 = 1;
/// Largest accepted page count.
pub const MAX_PAGES: u32 = 50;

/// Pages reserved outside the body: introduction, conclusion and references.
const RESERVED_PAGES: u32 = 3;
/// Minimum number of body chapters, regardless of the requested length.
const MIN_CORE_PAGES: u32 = 2;

/// Everything the student chose in the order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRequest {
    pub theme: String,
    pub discipline: String,
    pub level: AcademicLevel,
    pub pages: u32,
    pub style: WritingStyle,
    pub language: LanguageVariant,
    pub grade: GradeBand,
}

impl PaperRequest {
    /// Number of body chapters to generate: `max(pages - 3, 2)`.
    pub fn core_pages(&self) -> usize {
        self.pages.saturating_sub(RESERVED_PAGES).max(MIN_CORE_PAGES) as usize
    }

    /// Check the request before any API call is made.
    pub fn validate(&self) -> Result<(), PaperGenError> {
        if self.theme.trim().is_empty() {
            return Err(PaperGenError::InvalidRequest(
                "theme must not be empty".into(),
            ));
        }
        if self.discipline.trim().is_empty() {
            return Err(PaperGenError::InvalidRequest(
                "discipline must not be empty".into(),
            ));
        }
        if !(MIN_PAGES..=MAX_PAGES).contains(&self.pages) {
            return Err(PaperGenError::InvalidRequest(format!(
                "pages must be {MIN_PAGES}–{MAX_PAGES}, got {}",
                self.pages
            )));
        }
        Ok(())
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Academic level the text must be pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcademicLevel {
    #[serde(rename = "Ensino Secundário")]
    Secondary,
    #[serde(rename = "Ensino Médio")]
    HighSchool,
    #[serde(rename = "Técnico")]
    Technical,
    #[default]
    #[serde(rename = "Universidade")]
    University,
}

impl AcademicLevel {
    pub fn label(self) -> &'static str {
        match self {
            AcademicLevel::Secondary => "Ensino Secundário",
            AcademicLevel::HighSchool => "Ensino Médio",
            AcademicLevel::Technical => "Técnico",
            AcademicLevel::University => "Universidade",
        }
    }
}

/// Register of the prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WritingStyle {
    #[serde(rename = "Simples")]
    Simple,
    #[default]
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Aluno médio")]
    AverageStudent,
}

impl WritingStyle {
    pub fn label(self) -> &'static str {
        match self {
            WritingStyle::Simple => "Simples",
            WritingStyle::Normal => "Normal",
            WritingStyle::AverageStudent => "Aluno médio",
        }
    }
}

/// Portuguese variant used for spelling and vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LanguageVariant {
    #[default]
    #[serde(rename = "Português Angola")]
    Angola,
    #[serde(rename = "Português Brasil")]
    Brazil,
    #[serde(rename = "Português Portugal")]
    Portugal,
}

impl LanguageVariant {
    pub fn label(self) -> &'static str {
        match self {
            LanguageVariant::Angola => "Português Angola",
            LanguageVariant::Brazil => "Português Brasil",
            LanguageVariant::Portugal => "Português Portugal",
        }
    }
}

/// Grade band (0–20 scale) the student is aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradeBand {
    #[serde(rename = "10-14")]
    Pass,
    #[default]
    #[serde(rename = "14-17")]
    Good,
    #[serde(rename = "17-20")]
    Excellent,
}

impl GradeBand {
    pub fn label(self) -> &'static str {
        match self {
            GradeBand::Pass => "10-14",
            GradeBand::Good => "14-17",
            GradeBand::Excellent => "17-20",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

display_via_label!(AcademicLevel, WritingStyle, LanguageVariant, GradeBand);

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pages: u32) -> PaperRequest {
        PaperRequest {
            theme: "A água em Angola".into(),
            discipline: "Geografia".into(),
            level: AcademicLevel::University,
            pages,
            style: WritingStyle::Normal,
            language: LanguageVariant::Angola,
            grade: GradeBand::Good,
        }
    }

    #[test]
    fn core_pages_subtracts_reserved_pages() {
        assert_eq!(request(10).core_pages(), 7);
        assert_eq!(request(5).core_pages(), 2);
    }

    #[test]
    fn core_pages_is_floored_at_two() {
        for pages in 1..=5 {
            assert_eq!(request(pages).core_pages(), 2, "pages = {pages}");
        }
    }

    #[test]
    fn validate_rejects_out_of_range_pages() {
        assert!(request(0).validate().is_err());
        assert!(request(51).validate().is_err());
        assert!(request(1).validate().is_ok());
        assert!(request(50).validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_theme() {
        let mut r = request(5);
        r.theme = "   ".into();
        let err = r.validate().unwrap_err();
        assert!(err.to_string().contains("theme"));
    }

    #[test]
    fn enums_serialise_to_form_labels() {
        let json = serde_json::to_value(request(5)).unwrap();
        assert_eq!(json["level"], "Universidade");
        assert_eq!(json["style"], "Normal");
        assert_eq!(json["language"], "Português Angola");
        assert_eq!(json["grade"], "14-17");
    }

    #[test]
    fn deserialises_form_payload() {
        let r: PaperRequest = serde_json::from_str(
            r#"{"theme":"Petróleo","discipline":"Economia","level":"Ensino Médio",
                "pages":8,"style":"Aluno médio","language":"Português Portugal","grade":"17-20"}"#,
        )
        .unwrap();
        assert_eq!(r.level, AcademicLevel::HighSchool);
        assert_eq!(r.style, WritingStyle::AverageStudent);
        assert_eq!(r.language, LanguageVariant::Portugal);
        assert_eq!(r.grade, GradeBand::Excellent);
        assert_eq!(r.level.to_string(), "Ensino Médio");
    }
}
