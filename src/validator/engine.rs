use crate::catalog::RuleCatalog;

use super::authenticity::check_medical_authenticity;
use super::disease::check_disease_subtlety;
use super::specificity::check_patient_specificity;
use super::structure::check_structure;
use super::types::{
    IssueCategory, IssueKind, ValidationIssue, ValidationOptions, ValidationResult,
};

/// Minimum score for a document to count as valid.
pub const VALID_SCORE_THRESHOLD: u8 = 70;

/// Rule-based scorer for generated clinical notes.
///
/// Runs four independent passes (disease subtlety, patient specificity,
/// medical authenticity, structure) and aggregates their issues into a
/// deterministic 0-100 score. Pure computation: never fails, holds no state
/// across calls, and identical inputs produce identical results.
pub struct DocumentValidator {
    catalog: RuleCatalog,
}

impl DocumentValidator {
    pub fn new() -> Self {
        Self::with_catalog(RuleCatalog::default())
    }

    /// Use a caller-supplied lexicon bundle instead of the built-in one.
    pub fn with_catalog(catalog: RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Score a document. Malformed input is not an error; it simply
    /// accumulates issues and lands on a low score.
    pub fn validate(&self, document: &str, options: &ValidationOptions) -> ValidationResult {
        let document_lower = document.to_lowercase();

        let mut issues = Vec::new();
        issues.extend(check_disease_subtlety(&document_lower, options, &self.catalog));
        issues.extend(check_patient_specificity(&document_lower, options, &self.catalog));
        issues.extend(check_medical_authenticity(&document_lower, &self.catalog));
        issues.extend(check_structure(document, &document_lower, &self.catalog));

        let penalty: f64 = issues.iter().map(ValidationIssue::penalty).sum();
        let score = (100.0 - penalty).round().clamp(0.0, 100.0) as u8;

        let has_disease_error = issues
            .iter()
            .any(|i| i.kind == IssueKind::Error && i.category == IssueCategory::DiseaseMention);
        let is_valid = score >= VALID_SCORE_THRESHOLD && !has_disease_error;

        issues.sort_by(|a, b| b.severity.cmp(&a.severity));

        let errors = issues.iter().filter(|i| i.kind == IssueKind::Error).count();
        let warnings = issues.iter().filter(|i| i.kind == IssueKind::Warning).count();
        let summary = format!(
            "{} ({score}/100): {errors} errors, {warnings} warnings",
            score_bucket(score)
        );

        if !is_valid {
            tracing::warn!(score, errors, warnings, "document failed validation");
        }

        ValidationResult {
            is_valid,
            score,
            issues,
            summary,
        }
    }

    /// Validate a collection sequentially, preserving order. One item's
    /// result never affects another's; validation itself cannot fail, so the
    /// batch never short-circuits.
    pub fn validate_multiple<'a, I>(&self, items: I) -> Vec<ValidationResult>
    where
        I: IntoIterator<Item = (&'a str, &'a ValidationOptions)>,
    {
        items
            .into_iter()
            .map(|(document, options)| self.validate(document, options))
            .collect()
    }
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn score_bucket(score: u8) -> &'static str {
    match score {
        90.. => "Excellent",
        80..=89 => "Good",
        70..=79 => "Acceptable",
        _ => "Poor",
    }
}

/// Aggregate view over a batch of validation results.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub mean_score: f64,
}

pub fn summarize(results: &[ValidationResult]) -> BatchSummary {
    let total = results.len();
    let valid = results.iter().filter(|r| r.is_valid).count();
    let mean_score = if total == 0 {
        0.0
    } else {
        results.iter().map(|r| f64::from(r.score)).sum::<f64>() / total as f64
    };
    BatchSummary {
        total,
        valid,
        mean_score,
    }
}
