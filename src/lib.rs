//! Synthetic clinical note generation and scoring.
//!
//! Three cooperating pieces:
//! - [`validator`]: a pure, rule-based scorer that inspects a generated SOAP
//!   note for disease-name leakage, demographic fit, clinical authenticity,
//!   and structure, producing a deterministic 0-100 score with categorized
//!   issues.
//! - [`generator`]: builds prompts, calls a language-model collaborator,
//!   parses the response into SOAP sections, and drives a retry loop that
//!   keeps the best-scoring candidate when no attempt validates.
//! - [`evaluation`]: scores model differential-diagnosis output against
//!   ground-truth patient diagnoses.
//!
//! All batch operations run strictly sequentially; collaborator rate limits
//! are the binding constraint, not compute. The validator is pure and
//! stateless. This crate installs no tracing subscriber; embedders configure
//! their own.

pub mod catalog;
pub mod evaluation;
pub mod generator;
pub mod validator;

pub use catalog::RuleCatalog;
pub use evaluation::{DifferentialEvaluator, EvaluationError, PatientRecord};
pub use generator::{
    GenerationError, GenerationOptions, GenerationOutcome, SoapDocument, SoapGenerator,
};
pub use validator::{DocumentValidator, ValidationIssue, ValidationOptions, ValidationResult};
