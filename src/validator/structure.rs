//! Structure pass: all four SOAP section names must appear, and the document
//! length must be plausible for a single encounter note.

use crate::catalog::RuleCatalog;

use super::types::{IssueCategory, IssueKind, ValidationIssue};

/// Shorter than this and the note cannot carry a full encounter.
const MIN_DOCUMENT_CHARS: usize = 200;
/// Longer than this and the note has likely drifted into padding.
const MAX_DOCUMENT_CHARS: usize = 3000;

pub(crate) fn check_structure(
    document: &str,
    document_lower: &str,
    catalog: &RuleCatalog,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for section in &catalog.soap_section_names {
        if !document_lower.contains(section.as_str()) {
            issues.push(
                ValidationIssue::new(
                    IssueKind::Error,
                    IssueCategory::Structure,
                    8,
                    format!("Missing SOAP section '{section}'"),
                )
                .with_suggestion(format!("Add a labeled '{section}' section")),
            );
        }
    }

    let length = document.chars().count();
    if length < MIN_DOCUMENT_CHARS {
        issues.push(ValidationIssue::new(
            IssueKind::Warning,
            IssueCategory::Structure,
            5,
            format!("Document too short ({length} characters)"),
        ));
    } else if length > MAX_DOCUMENT_CHARS {
        issues.push(ValidationIssue::new(
            IssueKind::Info,
            IssueCategory::Structure,
            2,
            format!("Document unusually long ({length} characters)"),
        ));
    }

    issues
}
