use serde::{Deserialize, Serialize};

/// How serious an issue is for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Error,
    Warning,
    Info,
}

/// Which scoring pass raised the issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    DiseaseMention,
    PatientSpecificity,
    MedicalAuthenticity,
    Structure,
}

impl IssueCategory {
    /// Hand-tuned scoring weight applied per severity point. Kept as-is for
    /// score compatibility with existing consumers.
    pub fn weight(self) -> f64 {
        match self {
            Self::DiseaseMention => 1.0,
            Self::PatientSpecificity => 0.5,
            Self::MedicalAuthenticity => 0.7,
            Self::Structure => 0.3,
        }
    }
}

/// A single finding from one of the validator passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub category: IssueCategory,
    pub message: String,
    /// 1-10, feeds the weighted score deduction.
    pub severity: u8,
    /// Concrete fix, when one exists.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        kind: IssueKind,
        category: IssueCategory,
        severity: u8,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            message: message.into(),
            severity,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Weighted score deduction this issue contributes.
    pub fn penalty(&self) -> f64 {
        f64::from(self.severity) * self.category.weight()
    }
}

/// Outcome of validating one document. Derived entirely from the document
/// text and the options; two identical calls produce identical results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Score >= 70 and no error-kind disease mention.
    pub is_valid: bool,
    /// 0-100, weighted severity sum subtracted from 100.
    pub score: u8,
    /// Sorted by descending severity.
    pub issues: Vec<ValidationIssue>,
    /// Score bucket plus issue counts, for logs and UIs.
    pub summary: String,
}

impl ValidationResult {
    /// Count issues of a given kind.
    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    /// Whether any error-kind issue exists in the given category.
    pub fn has_error_in(&self, category: IssueCategory) -> bool {
        self.issues
            .iter()
            .any(|i| i.kind == IssueKind::Error && i.category == category)
    }
}

/// Caller-supplied context for a validation run. Read-only during validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// The condition the note must imply without naming.
    pub disease: String,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
    pub patient_race: Option<String>,
    /// Escalates synonym leaks from warnings to errors. Set by the generator
    /// on retry attempts.
    pub strict_mode: bool,
    /// Synonyms the caller explicitly permits; skipped by the synonym scan.
    pub allowed_disease_variations: Vec<String>,
}

impl ValidationOptions {
    pub fn new(disease: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            ..Self::default()
        }
    }
}
