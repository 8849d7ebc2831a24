use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::catalog::RuleCatalog;
use crate::validator::{DocumentValidator, ValidationOptions};

use super::prompt::{build_soap_prompt, SOAP_SYSTEM_PROMPT};
use super::types::{
    CancelToken, GenerationOptions, GenerationOutcome, LlmClient, SoapDocument, DEFAULT_MODEL,
};
use super::GenerationError;

/// Pause between attempts after a collaborator-level failure.
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Pause between items in batch generation, for collaborator rate limits.
const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Granularity at which backoff sleep rechecks the cancellation token.
const BACKOFF_SLICE: Duration = Duration::from_millis(100);

/// Drives the generate -> validate -> retry loop for synthetic SOAP notes.
///
/// Attempts are strictly sequential; the only suspension points are the
/// collaborator calls and the backoff sleep. When no attempt validates, the
/// highest-scoring candidate is returned as a best-effort document rather
/// than failing; the caller decides whether to accept it.
pub struct SoapGenerator {
    llm: Box<dyn LlmClient + Send + Sync>,
    validator: DocumentValidator,
    catalog: RuleCatalog,
    retry_backoff: Duration,
    batch_delay: Duration,
}

impl SoapGenerator {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            llm,
            validator: DocumentValidator::new(),
            catalog: RuleCatalog::default(),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    /// Substitute the validator (and its catalog) used for scoring.
    pub fn with_validator(mut self, validator: DocumentValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Generate one SOAP document.
    pub fn generate(
        &self,
        options: &GenerationOptions,
    ) -> Result<GenerationOutcome, GenerationError> {
        self.generate_cancellable(options, &CancelToken::new())
    }

    /// Generate one SOAP document, honoring a cancellation token. A cancelled
    /// run skips remaining retries and fails with a distinct outcome.
    pub fn generate_cancellable(
        &self,
        options: &GenerationOptions,
        cancel: &CancelToken,
    ) -> Result<GenerationOutcome, GenerationError> {
        let total_attempts = options.max_retries + 1;
        let profile = self.resolve_profile(options);
        let synonyms = self.catalog.synonyms_for(&options.disease).to_vec();

        let mut best: Option<SoapDocument> = None;
        let mut best_score: i32 = -1;
        let mut last_error: Option<GenerationError> = None;

        for attempt in 0..total_attempts {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }

            let prompt = build_soap_prompt(
                &options.disease,
                &synonyms,
                profile.age,
                &profile.gender,
                &profile.race,
                attempt,
            );

            let raw = match self.llm.generate(&profile.model, &prompt, SOAP_SYSTEM_PROMPT) {
                Ok(raw) => raw,
                Err(e @ GenerationError::MissingCredential(_)) => return Err(e),
                Err(GenerationError::Cancelled) => return Err(GenerationError::Cancelled),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "model call failed");
                    last_error = Some(e);
                    if attempt + 1 < total_attempts {
                        self.backoff(cancel)?;
                    }
                    continue;
                }
            };

            let mut document = SoapDocument::from_raw(&raw);
            if !options.validate_document {
                return Ok(GenerationOutcome::Unvalidated(document));
            }

            let validation_options = ValidationOptions {
                disease: options.disease.clone(),
                patient_age: Some(profile.age),
                patient_gender: Some(profile.gender.clone()),
                patient_race: Some(profile.race.clone()),
                strict_mode: attempt > 0,
                allowed_disease_variations: Vec::new(),
            };
            let result = self
                .validator
                .validate(&document.full_document, &validation_options);
            let score = result.score;
            let is_valid = result.is_valid;
            document.validation = Some(result);

            if is_valid {
                tracing::info!(attempt, score, "document validated");
                return Ok(GenerationOutcome::Valid(document));
            }

            tracing::info!(attempt, score, "document failed validation, retrying");
            // Ties keep the earlier candidate.
            if i32::from(score) > best_score {
                best_score = i32::from(score);
                best = Some(document);
            }
        }

        if let Some(document) = best {
            tracing::warn!(
                score = best_score,
                "no attempt validated, returning best candidate"
            );
            return Ok(GenerationOutcome::BestEffort(document));
        }

        match last_error {
            Some(source) => Err(GenerationError::Failed {
                attempts: total_attempts,
                source: Box::new(source),
            }),
            None => Err(GenerationError::NoDocument {
                attempts: total_attempts,
            }),
        }
    }

    /// Generate `count` documents sequentially with a fixed inter-call delay.
    /// A failed item is logged and skipped, never fatal to the batch.
    pub fn generate_multiple(
        &self,
        disease: &str,
        count: usize,
        model: Option<&str>,
    ) -> Vec<SoapDocument> {
        let mut documents = Vec::with_capacity(count);
        for item in 0..count {
            if item > 0 {
                thread::sleep(self.batch_delay);
            }
            let mut options = GenerationOptions::new(disease);
            options.model = model.map(str::to_string);
            match self.generate(&options) {
                Ok(outcome) => documents.push(outcome.into_document()),
                Err(e) => tracing::warn!(item, error = %e, "skipping failed generation"),
            }
        }
        documents
    }

    fn resolve_profile(&self, options: &GenerationOptions) -> ResolvedProfile {
        let mut rng = rand::thread_rng();
        ResolvedProfile {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            age: options.patient_age.unwrap_or_else(|| rng.gen_range(20..80)),
            gender: options.patient_gender.clone().unwrap_or_else(|| {
                if rng.gen_bool(0.5) { "Male" } else { "Female" }.to_string()
            }),
            race: options
                .patient_race
                .clone()
                .unwrap_or_else(|| "Not specified".to_string()),
        }
    }

    fn backoff(&self, cancel: &CancelToken) -> Result<(), GenerationError> {
        let mut remaining = self.retry_backoff;
        while remaining > Duration::ZERO {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }
            let step = remaining.min(BACKOFF_SLICE);
            thread::sleep(step);
            remaining -= step;
        }
        Ok(())
    }
}

struct ResolvedProfile {
    model: String,
    age: u32,
    gender: String,
    race: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Scripted collaborator: returns queued responses in order and records
    /// every prompt it receives.
    struct ScriptedLlmClient {
        script: Mutex<Vec<Result<String, GenerationError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlmClient {
        fn new(script: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                script: Mutex::new(script),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn recorded_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl LlmClient for ScriptedLlmClient {
        fn generate(
            &self,
            _model: &str,
            prompt: &str,
            _system: &str,
        ) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut script = self.script.lock().unwrap();
            assert!(!script.is_empty(), "collaborator called more than scripted");
            script.remove(0)
        }
    }

    fn clean_note() -> String {
        "SUBJECTIVE: He reports recurring morning headaches over the past month. \
         Family history significant for cardiac disease; lifestyle includes a \
         sedentary occupation. She has no other complaints. OBJECTIVE: Blood \
         pressure 158/96, heart rate 88, temperature 37.0, respiratory rate 16. \
         Examination otherwise unremarkable, no edema noted. ASSESSMENT: Elevated \
         readings on repeat measurement; chief complaint correlates with the \
         findings. PLAN: Follow-up in two weeks with home readings and medication \
         dosage review."
            .to_string()
    }

    fn leaky_note() -> String {
        clean_note().replace("Elevated readings", "Hypertension with elevated readings")
    }

    fn options(max_retries: usize) -> GenerationOptions {
        let mut options = GenerationOptions::new("Hypertension");
        options.patient_age = Some(45);
        options.patient_gender = Some("Male".into());
        options.max_retries = max_retries;
        options
    }

    fn generator(script: Vec<Result<String, GenerationError>>) -> SoapGenerator {
        SoapGenerator::new(Box::new(ScriptedLlmClient::new(script)))
            .with_retry_backoff(Duration::ZERO)
            .with_batch_delay(Duration::ZERO)
    }

    #[test]
    fn first_valid_attempt_returns_immediately() {
        let generator = generator(vec![Ok(clean_note())]);
        let outcome = generator.generate(&options(2)).unwrap();

        assert!(outcome.is_valid());
        let document = outcome.document();
        assert!(document.validation.as_ref().unwrap().is_valid);
        assert!(document.subjective.contains("morning headaches"));
        assert!(document.plan.contains("Follow-up"));
    }

    #[test]
    fn leaky_first_attempt_is_retried_and_clean_retry_wins() {
        let generator = generator(vec![Ok(leaky_note()), Ok(clean_note())]);
        let outcome = generator.generate(&options(1)).unwrap();

        assert!(outcome.is_valid());
        assert!(!outcome
            .document()
            .full_document
            .to_lowercase()
            .contains("hypertension"));
    }

    #[test]
    fn retry_prompt_carries_retry_guidance() {
        let client = ScriptedLlmClient::new(vec![Ok(leaky_note()), Ok(clean_note())]);
        let prompts_handle = std::sync::Arc::new(client);
        // Box a forwarding client so we can keep a handle to the recordings.
        struct Forward(std::sync::Arc<ScriptedLlmClient>);
        impl LlmClient for Forward {
            fn generate(
                &self,
                model: &str,
                prompt: &str,
                system: &str,
            ) -> Result<String, GenerationError> {
                self.0.generate(model, prompt, system)
            }
        }
        let generator = SoapGenerator::new(Box::new(Forward(prompts_handle.clone())))
            .with_retry_backoff(Duration::ZERO);

        generator.generate(&options(1)).unwrap();

        let prompts = prompts_handle.recorded_prompts();
        assert_eq!(prompts.len(), 2);
        assert!(!prompts[0].contains("RETRY GUIDANCE"));
        assert!(prompts[1].contains("RETRY GUIDANCE"));
        assert!(prompts[0].contains("high blood pressure"), "synonyms listed");
    }

    #[test]
    fn best_effort_returns_highest_scoring_candidate() {
        // All three attempts leak the disease name, with quality increasing
        // across attempts: the middle-quality draft comes last to prove the
        // selection is by score, not recency.
        let worst = "hypertension".to_string();
        let best = leaky_note();
        let middle =
            "SUBJECTIVE: hypertension history reviewed. OBJECTIVE: BP 140/90.".to_string();

        let generator = generator(vec![Ok(worst), Ok(best.clone()), Ok(middle)]);
        let outcome = generator.generate(&options(2)).unwrap();

        match outcome {
            GenerationOutcome::BestEffort(document) => {
                assert_eq!(document.full_document, best);
                let validation = document.validation.unwrap();
                assert!(!validation.is_valid);
            }
            other => panic!("expected BestEffort, got {other:?}"),
        }
    }

    #[test]
    fn best_effort_tie_keeps_earlier_candidate() {
        // Two drafts with identical issue profiles, distinguishable only by
        // wording that no lexicon matches.
        let first = "hypertension noted alpha".to_string();
        let second = "hypertension noted bravo".to_string();

        let generator = generator(vec![Ok(first.clone()), Ok(second)]);
        let outcome = generator.generate(&options(1)).unwrap();

        match outcome {
            GenerationOutcome::BestEffort(document) => {
                assert_eq!(document.full_document, first);
            }
            other => panic!("expected BestEffort, got {other:?}"),
        }
    }

    #[test]
    fn validation_disabled_returns_first_response_unvalidated() {
        let generator = generator(vec![Ok(leaky_note())]);
        let mut opts = options(2);
        opts.validate_document = false;

        let outcome = generator.generate(&opts).unwrap();
        match outcome {
            GenerationOutcome::Unvalidated(document) => {
                assert!(document.validation.is_none());
            }
            other => panic!("expected Unvalidated, got {other:?}"),
        }
    }

    #[test]
    fn collaborator_failure_then_success_recovers() {
        let generator = generator(vec![
            Err(GenerationError::Api {
                status: 429,
                body: "rate limited".into(),
            }),
            Ok(clean_note()),
        ]);
        let outcome = generator.generate(&options(1)).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn exhausted_collaborator_failures_surface_last_error() {
        let generator = generator(vec![
            Err(GenerationError::Connection("host a".into())),
            Err(GenerationError::Api {
                status: 503,
                body: "unavailable".into(),
            }),
        ]);
        let error = generator.generate(&options(1)).unwrap_err();

        match error {
            GenerationError::Failed { attempts, source } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*source, GenerationError::Api { status: 503, .. }));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn missing_credential_fails_fast_without_retry() {
        // Script a second response to prove it is never consumed.
        let generator = generator(vec![
            Err(GenerationError::MissingCredential("OPENAI_API_KEY")),
            Ok(clean_note()),
        ]);
        let error = generator.generate(&options(3)).unwrap_err();
        assert!(matches!(error, GenerationError::MissingCredential(_)));
    }

    #[test]
    fn cancelled_token_aborts_before_any_attempt() {
        let generator = generator(vec![Ok(clean_note())]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let error = generator
            .generate_cancellable(&options(2), &cancel)
            .unwrap_err();
        assert!(matches!(error, GenerationError::Cancelled));
    }

    #[test]
    fn cancellation_during_backoff_skips_remaining_retries() {
        let generator = SoapGenerator::new(Box::new(ScriptedLlmClient::new(vec![
            Err(GenerationError::Connection("host".into())),
            Ok(clean_note()),
        ])))
        .with_retry_backoff(Duration::from_secs(5));

        let cancel = CancelToken::new();
        let cancel_clone = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            cancel_clone.cancel();
        });

        let start = std::time::Instant::now();
        let error = generator
            .generate_cancellable(&options(1), &cancel)
            .unwrap_err();
        assert!(matches!(error, GenerationError::Cancelled));
        assert!(
            start.elapsed() < Duration::from_secs(4),
            "cancellation should cut the backoff short"
        );
    }

    #[test]
    fn batch_skips_failed_items() {
        let generator = generator(vec![
            Ok(clean_note()),
            Err(GenerationError::Connection("host".into())),
            Err(GenerationError::Connection("host".into())),
            Err(GenerationError::Connection("host".into())),
            Ok(clean_note()),
        ]);

        // Item 2 exhausts its attempts (max_retries defaults to 2) and is
        // skipped; items 1 and 3 succeed.
        let documents = generator.generate_multiple("Hypertension", 3, Some("gpt-4"));
        assert_eq!(documents.len(), 2);
    }

    #[test]
    fn default_model_used_when_unset() {
        let generator = generator(vec![]);
        let profile = generator.resolve_profile(&GenerationOptions::new("Asthma"));
        assert_eq!(profile.model, DEFAULT_MODEL);
        assert!((20..80).contains(&profile.age));
        assert!(profile.gender == "Male" || profile.gender == "Female");
        assert_eq!(profile.race, "Not specified");
    }
}
