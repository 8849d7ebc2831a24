//! Patient specificity pass: the note should read as written for this
//! patient, not for a template demographic.

use crate::catalog::RuleCatalog;

use super::types::{IssueCategory, IssueKind, ValidationIssue, ValidationOptions};

pub(crate) fn check_patient_specificity(
    document_lower: &str,
    options: &ValidationOptions,
    catalog: &RuleCatalog,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(age) = options.patient_age {
        let (band, terms) = catalog.age_band_terms(age);
        let any_present = terms.iter().any(|t| document_lower.contains(t.as_str()));
        if !any_present {
            issues.push(
                ValidationIssue::new(
                    IssueKind::Warning,
                    IssueCategory::PatientSpecificity,
                    3,
                    format!("No {band}-appropriate vocabulary for a {age}-year-old patient"),
                )
                .with_suggestion(format!(
                    "Work age context into the history (e.g. '{}')",
                    terms.first().map(String::as_str).unwrap_or_default()
                )),
            );
        }
    }

    if let Some(gender) = options.patient_gender.as_deref() {
        let pronouns = match gender.to_lowercase().as_str() {
            "male" | "m" => Some(&catalog.male_pronouns),
            "female" | "f" => Some(&catalog.female_pronouns),
            _ => None,
        };
        if let Some(pronouns) = pronouns {
            let any_present = pronouns.iter().any(|p| contains_word(document_lower, p));
            if !any_present {
                issues.push(ValidationIssue::new(
                    IssueKind::Info,
                    IssueCategory::PatientSpecificity,
                    2,
                    format!("No {} pronouns found for a {gender} patient", gender.to_lowercase()),
                ));
            }
        }
    }

    // Race/ethnicity hook: deliberately contributes no issues. Tying clinical
    // claims to race would fabricate heuristics the data does not support.
    let _ = options.patient_race.as_deref();

    let generic_count: usize = catalog
        .generic_phrases
        .iter()
        .map(|p| count_occurrences(document_lower, p))
        .sum();
    if generic_count > 10 {
        issues.push(ValidationIssue::new(
            IssueKind::Info,
            IssueCategory::PatientSpecificity,
            2,
            format!("Generic patient phrasing used {generic_count} times"),
        ));
    }

    issues
}

/// Whole-word presence check. Substring matching would find "he" inside
/// "the", so pronouns need word boundaries.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
