//! Static clinical lexicons backing the document validator.
//!
//! All term lists live here as const tables and are bundled into a
//! [`RuleCatalog`] that the validator takes at construction. Tests (and
//! downstream callers with custom vocabularies) can substitute their own
//! catalog instead of the built-in one.

use std::collections::HashMap;

/// Synonym/paraphrase table for common chronic conditions. A generated note
/// must not contain the disease name, and these are the paraphrases that give
/// the diagnosis away almost as directly.
const DISEASE_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "hypertension",
        &["high blood pressure", "htn", "elevated bp", "hypertensive"],
    ),
    (
        "diabetes",
        &["high blood sugar", "elevated glucose", "hyperglycemia", "dm"],
    ),
    (
        "asthma",
        &["wheezing disorder", "bronchospasm", "reactive airway"],
    ),
    (
        "depression",
        &["major depressive", "depressive disorder", "mdd", "low mood disorder"],
    ),
    (
        "anxiety",
        &["anxious disorder", "gad", "panic disorder"],
    ),
    (
        "obesity",
        &["overweight", "elevated bmi", "high bmi"],
    ),
    (
        "migraine",
        &["severe headache disorder", "recurrent headache"],
    ),
    (
        "copd",
        &["chronic obstructive", "emphysema", "chronic bronchitis"],
    ),
];

/// Phrases that announce a diagnosis instead of letting the findings imply it.
const OBVIOUS_DIAGNOSIS_PHRASES: &[&str] = &[
    "diagnosed with",
    "diagnosis of",
    "confirmed diagnosis",
    "shows signs of",
    "consistent with",
    "suggestive of",
];

/// Vocabulary expected in a pediatric (< 18) note.
const PEDIATRIC_TERMS: &[&str] = &[
    "pediatric",
    "adolescent",
    "growth",
    "development",
    "school",
    "parent",
];

/// Vocabulary expected in an adult (18-64) note.
const ADULT_TERMS: &[&str] = &[
    "adult",
    "working",
    "occupation",
    "family history",
    "lifestyle",
];

/// Vocabulary expected in a geriatric (>= 65) note.
const GERIATRIC_TERMS: &[&str] = &[
    "elderly",
    "geriatric",
    "aging",
    "retirement",
    "medicare",
    "senior",
];

const MALE_PRONOUNS: &[&str] = &["he", "him", "his"];
const FEMALE_PRONOUNS: &[&str] = &["she", "her"];

/// Boilerplate phrasings whose overuse makes a note read as template output.
const GENERIC_PHRASES: &[&str] = &[
    "the patient",
    "patient reports",
    "patient denies",
    "patient presents",
];

/// Vital-sign keywords a real objective section spells out.
const VITAL_SIGN_TERMS: &[&str] = &[
    "blood pressure",
    "heart rate",
    "temperature",
    "respiratory rate",
];

/// General clinical vocabulary used for the term-density check.
const CLINICAL_TERMS: &[&str] = &[
    "blood pressure",
    "heart rate",
    "temperature",
    "respiratory rate",
    "oxygen saturation",
    "vital signs",
    "auscultation",
    "palpation",
    "examination",
    "tenderness",
    "edema",
    "murmur",
    "bilateral",
    "unremarkable",
    "range of motion",
    "review of systems",
    "chief complaint",
    "symptoms",
    "onset",
    "duration",
    "medication",
    "dosage",
    "follow-up",
    "referral",
    "prognosis",
];

/// Informal wording that undercuts clinical register.
const INFORMAL_TERMS: &[&str] = &[
    "feels",
    "seems",
    "looks",
    "appears to be",
    "maybe",
    "probably",
];

/// Workflow stages a complete encounter note walks through.
/// Matched with whitespace stripped from both sides.
const WORKFLOW_TERMS: &[&str] = &[
    "chief complaint",
    "history",
    "examination",
    "assessment",
    "plan",
];

/// The four SOAP section names, in document order.
const SOAP_SECTION_NAMES: &[&str] = &["subjective", "objective", "assessment", "plan"];

/// Immutable lexicon bundle injected into the validator.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    /// Lower-cased disease name -> paraphrases that leak the diagnosis.
    pub disease_synonyms: HashMap<String, Vec<String>>,
    pub obvious_diagnosis_phrases: Vec<String>,
    pub pediatric_terms: Vec<String>,
    pub adult_terms: Vec<String>,
    pub geriatric_terms: Vec<String>,
    pub male_pronouns: Vec<String>,
    pub female_pronouns: Vec<String>,
    pub generic_phrases: Vec<String>,
    pub vital_sign_terms: Vec<String>,
    pub clinical_terms: Vec<String>,
    pub informal_terms: Vec<String>,
    pub workflow_terms: Vec<String>,
    pub soap_section_names: Vec<String>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            disease_synonyms: DISEASE_SYNONYMS
                .iter()
                .map(|(disease, synonyms)| {
                    (
                        (*disease).to_string(),
                        synonyms.iter().map(|s| (*s).to_string()).collect(),
                    )
                })
                .collect(),
            obvious_diagnosis_phrases: owned(OBVIOUS_DIAGNOSIS_PHRASES),
            pediatric_terms: owned(PEDIATRIC_TERMS),
            adult_terms: owned(ADULT_TERMS),
            geriatric_terms: owned(GERIATRIC_TERMS),
            male_pronouns: owned(MALE_PRONOUNS),
            female_pronouns: owned(FEMALE_PRONOUNS),
            generic_phrases: owned(GENERIC_PHRASES),
            vital_sign_terms: owned(VITAL_SIGN_TERMS),
            clinical_terms: owned(CLINICAL_TERMS),
            informal_terms: owned(INFORMAL_TERMS),
            workflow_terms: owned(WORKFLOW_TERMS),
            soap_section_names: owned(SOAP_SECTION_NAMES),
        }
    }
}

impl RuleCatalog {
    /// Look up the synonym list for a disease (case-insensitive).
    pub fn synonyms_for(&self, disease: &str) -> &[String] {
        self.disease_synonyms
            .get(&disease.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Vocabulary expected for the patient's age band, with the band label
    /// used in issue messages.
    pub fn age_band_terms(&self, age: u32) -> (&'static str, &[String]) {
        if age < 18 {
            ("pediatric", &self.pediatric_terms)
        } else if age < 65 {
            ("adult", &self.adult_terms)
        } else {
            ("geriatric", &self.geriatric_terms)
        }
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_string()).collect()
}
