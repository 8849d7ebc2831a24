use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::GenerationError;
use crate::validator::ValidationResult;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default number of regeneration attempts after the first.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Language-model collaborator seam. Production uses [`super::OpenAiClient`];
/// tests substitute mocks.
pub trait LlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, GenerationError>;
}

/// Caller-facing knobs for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// The condition the note must imply without naming.
    pub disease: String,
    pub model: Option<String>,
    /// Randomized in [20, 80) when absent.
    pub patient_age: Option<u32>,
    /// Uniform Male/Female when absent.
    pub patient_gender: Option<String>,
    pub patient_race: Option<String>,
    pub validate_document: bool,
    pub max_retries: usize,
}

impl GenerationOptions {
    pub fn new(disease: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            model: None,
            patient_age: None,
            patient_gender: None,
            patient_race: None,
            validate_document: true,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// A parsed SOAP note. Sections come from header-anchored extraction over the
/// raw model response; a section whose header is absent stays empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoapDocument {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
    /// The original model response, untouched.
    pub full_document: String,
    /// RFC 3339 creation timestamp.
    pub generated_at: String,
    /// Attached once by the generator when validation runs; `None` means the
    /// document was returned unvalidated.
    pub validation: Option<ValidationResult>,
}

impl SoapDocument {
    /// Parse a raw model response into a document.
    pub fn from_raw(raw: &str) -> Self {
        let (subjective, objective, assessment, plan) = super::parse_soap_sections(raw);
        Self {
            subjective,
            objective,
            assessment,
            plan,
            full_document: raw.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            validation: None,
        }
    }
}

/// How a generation run ended when it produced a document.
///
/// Explicit sum type so a best-effort document cannot be mistaken for a
/// validated one without matching on the variant.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// Validation ran and passed.
    Valid(SoapDocument),
    /// No attempt validated; this is the highest-scoring candidate seen.
    BestEffort(SoapDocument),
    /// Validation was disabled; first successful response, unscored.
    Unvalidated(SoapDocument),
}

impl GenerationOutcome {
    pub fn document(&self) -> &SoapDocument {
        match self {
            Self::Valid(doc) | Self::BestEffort(doc) | Self::Unvalidated(doc) => doc,
        }
    }

    pub fn into_document(self) -> SoapDocument {
        match self {
            Self::Valid(doc) | Self::BestEffort(doc) | Self::Unvalidated(doc) => doc,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Cooperative cancellation flag shared between the caller and a running
/// generation. Checked before each attempt and during backoff; the in-flight
/// HTTP call itself is bounded by the client's request timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
