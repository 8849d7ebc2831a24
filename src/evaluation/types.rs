use serde::{Deserialize, Serialize};

/// A patient record supplied by the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u32,
    pub gender: String,
    pub ethnicity: String,
    pub race: String,
    /// Ground-truth diagnosis, when charted.
    pub diagnosis: Option<String>,
    pub subjective: Option<String>,
    pub objective: Option<String>,
}

/// The model's likelihood label for a candidate condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conclusion {
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "needs follow-up")]
    NeedsFollowUp,
}

/// One candidate condition from the model's differential list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Differential {
    pub condition: String,
    pub conclusion: Conclusion,
    pub reasoning: String,
}

/// Outcome of evaluating one record's differentials against ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub differentials: Vec<Differential>,
    pub ground_truth: Option<String>,
    /// True when a positive differential matches the ground truth.
    pub matched: bool,
    pub matched_condition: Option<String>,
}

/// Aggregate over a batch evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvaluation {
    pub evaluated: usize,
    pub skipped: usize,
    pub hits: usize,
    /// hits / evaluated; 0.0 for an empty run.
    pub accuracy: f64,
}
