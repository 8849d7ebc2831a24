use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::generator::{GenerationError, LlmClient, DEFAULT_MODEL};

use super::types::{BatchEvaluation, Conclusion, Differential, EvaluationReport, PatientRecord};
use super::EvaluationError;

const DIFFERENTIAL_SYSTEM_PROMPT: &str = r#"
You are a clinical reasoning assistant. Given a patient's demographics and
encounter notes, list the differential diagnoses you would consider.

Output ONLY a JSON object wrapped in ```json``` fences with this shape:
{"differentials": [{"condition": "...", "conclusion": "positive | negative | needs follow-up", "reasoning": "..."}]}
"#;

/// Pause between records in batch evaluation, for collaborator rate limits.
const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Evaluates model differentials against ground-truth diagnoses.
pub struct DifferentialEvaluator {
    llm: Box<dyn LlmClient + Send + Sync>,
    model: String,
    batch_delay: Duration,
}

impl DifferentialEvaluator {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model: Option<&str>) -> Self {
        Self {
            llm,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Ask the collaborator for differentials and score them against the
    /// record's ground-truth diagnosis. Collaborator failures are errors;
    /// a malformed response is not: it degrades to an empty differential
    /// list and a miss.
    pub fn evaluate_record(
        &self,
        record: &PatientRecord,
    ) -> Result<EvaluationReport, EvaluationError> {
        let prompt = build_differential_prompt(record);
        let raw = self
            .llm
            .generate(&self.model, &prompt, DIFFERENTIAL_SYSTEM_PROMPT)?;

        let differentials = parse_differentials(&raw);
        let (matched, matched_condition) = match record.diagnosis.as_deref() {
            Some(ground_truth) => match_against(&differentials, ground_truth),
            None => (false, None),
        };

        Ok(EvaluationReport {
            differentials,
            ground_truth: record.diagnosis.clone(),
            matched,
            matched_condition,
        })
    }

    /// Evaluate records sequentially with a fixed inter-call delay. A failed
    /// record is logged and skipped; the batch always completes.
    pub fn evaluate_batch(
        &self,
        records: &[PatientRecord],
    ) -> (Vec<EvaluationReport>, BatchEvaluation) {
        let mut reports = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (item, record) in records.iter().enumerate() {
            if item > 0 {
                thread::sleep(self.batch_delay);
            }
            match self.evaluate_record(record) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::warn!(item, error = %e, "skipping failed evaluation");
                    skipped += 1;
                }
            }
        }

        let hits = reports.iter().filter(|r| r.matched).count();
        let evaluated = reports.len();
        let accuracy = if evaluated == 0 {
            0.0
        } else {
            hits as f64 / evaluated as f64
        };

        (
            reports,
            BatchEvaluation {
                evaluated,
                skipped,
                hits,
                accuracy,
            },
        )
    }
}

fn build_differential_prompt(record: &PatientRecord) -> String {
    format!(
        r#"Patient: {}-year-old {}, ethnicity: {}, race: {}.

Subjective: {}
Objective: {}

List every differential diagnosis worth considering, with a conclusion for
each: "positive" (likely present), "negative" (ruled out), or
"needs follow-up" (more workup required)."#,
        record.age,
        record.gender,
        record.ethnicity,
        record.race,
        record.subjective.as_deref().unwrap_or("Not documented."),
        record.objective.as_deref().unwrap_or("Not documented."),
    )
}

/// A hit is a positive-conclusion differential whose condition matches the
/// ground truth case-insensitively, substring in either direction.
fn match_against(
    differentials: &[Differential],
    ground_truth: &str,
) -> (bool, Option<String>) {
    let truth_lower = ground_truth.to_lowercase();
    for differential in differentials {
        if differential.conclusion != Conclusion::Positive {
            continue;
        }
        let condition_lower = differential.condition.to_lowercase();
        if condition_lower.contains(&truth_lower) || truth_lower.contains(&condition_lower) {
            return (true, Some(differential.condition.clone()));
        }
    }
    (false, None)
}

/// Parse differentials from the raw response, fenced or bare JSON. Items
/// that fail to deserialize are skipped; a response with no parseable JSON
/// yields an empty list.
fn parse_differentials(response: &str) -> Vec<Differential> {
    #[derive(Deserialize)]
    struct Wire {
        differentials: Option<Vec<serde_json::Value>>,
    }

    let json_str = extract_json_block(response).unwrap_or_else(|| response.trim().to_string());
    let wire: Wire = match serde_json::from_str(&json_str) {
        Ok(wire) => wire,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable differential response, degrading to empty list");
            return Vec::new();
        }
    };

    wire.differentials
        .unwrap_or_default()
        .iter()
        .filter_map(|value| serde_json::from_value(value.clone()).ok())
        .collect()
}

/// Extract the contents of a ```json fenced block, if one exists.
fn extract_json_block(response: &str) -> Option<String> {
    let start = response.find("```json")?;
    let content_start = start + 7;
    let end = response[content_start..].find("```")?;
    Some(response[content_start..content_start + end].trim().to_string())
}
