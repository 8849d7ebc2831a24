//! Medical authenticity pass: a believable note carries vital signs, numeric
//! values, clinical vocabulary, and a complete encounter workflow.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::RuleCatalog;

use super::types::{IssueCategory, IssueKind, ValidationIssue};

static DIGIT_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern"));

/// Minimum vital-sign keywords a credible objective section names.
const MIN_VITAL_TERMS: usize = 2;
/// Minimum distinct clinical-vocabulary matches.
const MIN_CLINICAL_TERMS: usize = 5;
/// Informal wording tolerated before the register reads unprofessional.
const MAX_INFORMAL_TERMS: usize = 2;
/// Minimum encounter-workflow stages mentioned.
const MIN_WORKFLOW_TERMS: usize = 3;

pub(crate) fn check_medical_authenticity(
    document_lower: &str,
    catalog: &RuleCatalog,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let vital_count = catalog
        .vital_sign_terms
        .iter()
        .filter(|t| document_lower.contains(t.as_str()))
        .count();
    if vital_count < MIN_VITAL_TERMS {
        issues.push(
            ValidationIssue::new(
                IssueKind::Warning,
                IssueCategory::MedicalAuthenticity,
                5,
                format!("Only {vital_count} vital-sign keyword(s) present"),
            )
            .with_suggestion("Spell out vitals such as blood pressure and heart rate"),
        );
    }

    let clinical_count = catalog
        .clinical_terms
        .iter()
        .filter(|t| document_lower.contains(t.as_str()))
        .count();
    if clinical_count < MIN_CLINICAL_TERMS {
        issues.push(ValidationIssue::new(
            IssueKind::Warning,
            IssueCategory::MedicalAuthenticity,
            4,
            format!("Low clinical-term density ({clinical_count} distinct terms)"),
        ));
    }

    if !DIGIT_SEQUENCE.is_match(document_lower) {
        issues.push(
            ValidationIssue::new(
                IssueKind::Warning,
                IssueCategory::MedicalAuthenticity,
                6,
                "No numeric values anywhere in the document",
            )
            .with_suggestion("Include measured values for vitals and findings"),
        );
    }

    let informal_count: usize = catalog
        .informal_terms
        .iter()
        .map(|t| document_lower.matches(t.as_str()).count())
        .sum();
    if informal_count > MAX_INFORMAL_TERMS {
        issues.push(ValidationIssue::new(
            IssueKind::Warning,
            IssueCategory::MedicalAuthenticity,
            3,
            format!("Informal language used {informal_count} times"),
        ));
    }

    // Whitespace-stripped comparison so "chief complaint" matches however the
    // note spaces or wraps it.
    let squeezed: String = document_lower
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let workflow_count = catalog
        .workflow_terms
        .iter()
        .filter(|t| {
            let squeezed_term: String = t.chars().filter(|c| !c.is_whitespace()).collect();
            squeezed.contains(&squeezed_term)
        })
        .count();
    if workflow_count < MIN_WORKFLOW_TERMS {
        issues.push(ValidationIssue::new(
            IssueKind::Warning,
            IssueCategory::MedicalAuthenticity,
            4,
            format!("Encounter workflow incomplete ({workflow_count} of {} stages)", catalog.workflow_terms.len()),
        ));
    }

    issues
}
