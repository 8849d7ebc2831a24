//! Disease subtlety pass: the note must imply the condition through findings
//! without naming it, paraphrasing it, or announcing a diagnosis.

use crate::catalog::RuleCatalog;

use super::types::{IssueCategory, IssueKind, ValidationIssue, ValidationOptions};

/// Scan for the disease name, its synonyms, and diagnosis-announcing phrases.
/// `document_lower` is the full document, already lower-cased.
pub(crate) fn check_disease_subtlety(
    document_lower: &str,
    options: &ValidationOptions,
    catalog: &RuleCatalog,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let disease_lower = options.disease.trim().to_lowercase();
    if disease_lower.is_empty() {
        return issues;
    }

    // Exact mention is the one finding that invalidates the document outright.
    if document_lower.contains(&disease_lower) {
        issues.push(
            ValidationIssue::new(
                IssueKind::Error,
                IssueCategory::DiseaseMention,
                10,
                format!("Document explicitly mentions the disease name '{}'", options.disease),
            )
            .with_suggestion("Describe the clinical findings without naming the condition"),
        );
    }

    let allowed: Vec<String> = options
        .allowed_disease_variations
        .iter()
        .map(|v| v.to_lowercase())
        .collect();

    for synonym in catalog.synonyms_for(&disease_lower) {
        if allowed.iter().any(|a| a == synonym) {
            continue;
        }
        if document_lower.contains(synonym.as_str()) {
            // Strict mode (retry attempts) treats a synonym leak as a hard
            // failure rather than a deduction.
            let kind = if options.strict_mode {
                IssueKind::Error
            } else {
                IssueKind::Warning
            };
            issues.push(
                ValidationIssue::new(
                    kind,
                    IssueCategory::DiseaseMention,
                    7,
                    format!("Document contains the disease synonym '{synonym}'"),
                )
                .with_suggestion("Replace the paraphrase with the underlying findings"),
            );
        }
    }

    for phrase in &catalog.obvious_diagnosis_phrases {
        if document_lower.contains(phrase.as_str()) {
            issues.push(ValidationIssue::new(
                IssueKind::Warning,
                IssueCategory::DiseaseMention,
                4,
                format!("Diagnosis-announcing phrase '{phrase}' found"),
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(document: &str, options: &ValidationOptions) -> Vec<ValidationIssue> {
        check_disease_subtlety(&document.to_lowercase(), options, &RuleCatalog::default())
    }

    #[test]
    fn exact_mention_is_severity_ten_error() {
        let options = ValidationOptions::new("Hypertension");
        let issues = run("The patient has Hypertension and needs treatment.", &options);
        assert!(issues
            .iter()
            .any(|i| i.kind == IssueKind::Error && i.severity == 10));
    }

    #[test]
    fn mention_detection_ignores_case() {
        let options = ValidationOptions::new("hypertension");
        let issues = run("HYPERTENSION noted on prior visit.", &options);
        assert!(issues.iter().any(|i| i.severity == 10));
    }

    #[test]
    fn synonym_is_severity_seven_warning() {
        let options = ValidationOptions::new("Hypertension");
        let issues = run("Elevated readings, consistent with high blood pressure.", &options);
        let synonym = issues
            .iter()
            .find(|i| i.severity == 7)
            .expect("synonym issue");
        assert_eq!(synonym.kind, IssueKind::Warning);
        assert!(!issues.iter().any(|i| i.severity == 10));
    }

    #[test]
    fn strict_mode_escalates_synonym_to_error() {
        let mut options = ValidationOptions::new("Hypertension");
        options.strict_mode = true;
        let issues = run("Readings suggest high blood pressure.", &options);
        let synonym = issues.iter().find(|i| i.severity == 7).unwrap();
        assert_eq!(synonym.kind, IssueKind::Error);
    }

    #[test]
    fn allowed_variation_is_skipped() {
        let mut options = ValidationOptions::new("Hypertension");
        options.allowed_disease_variations = vec!["htn".into()];
        let issues = run("Chart abbreviation HTN carried forward.", &options);
        assert!(!issues.iter().any(|i| i.severity == 7));
    }

    #[test]
    fn obvious_phrases_each_raise_one_issue() {
        let options = ValidationOptions::new("Diabetes");
        let issues = run(
            "Findings consistent with prior labs. Presentation suggestive of poor control.",
            &options,
        );
        let phrase_issues: Vec<_> = issues.iter().filter(|i| i.severity == 4).collect();
        assert_eq!(phrase_issues.len(), 2);
    }

    #[test]
    fn clean_document_raises_nothing() {
        let options = ValidationOptions::new("Hypertension");
        let issues = run("Blood pressure 158/96, heart rate 88, follow up in two weeks.", &options);
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_disease_raises_nothing() {
        let options = ValidationOptions::new("  ");
        let issues = run("Any document text at all.", &options);
        assert!(issues.is_empty());
    }
}
