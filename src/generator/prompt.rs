//! Prompt construction for synthetic SOAP note generation.

/// System instruction fixing the subtlety requirement for every attempt.
pub const SOAP_SYSTEM_PROMPT: &str = r#"
You are a clinical documentation writer producing realistic SOAP notes for
training purposes.

RULES (ABSOLUTE, NO EXCEPTIONS):
1. NEVER write the target condition's name anywhere in the note.
2. NEVER use common synonyms, abbreviations, or paraphrases of the condition.
3. The condition must be implied ONLY through symptoms, vital signs, exam
   findings, and the treatment plan.
4. Write all four sections with labeled headers: SUBJECTIVE, OBJECTIVE,
   ASSESSMENT, PLAN.
5. Use professional clinical register with concrete numeric values for all
   vital signs and measurements.
6. Match the documentation style to the patient's age and demographics.
"#;

/// Build the user prompt for one attempt. `attempt` > 0 appends retry
/// guidance that tightens the constraints the previous attempt broke.
pub fn build_soap_prompt(
    disease: &str,
    synonyms: &[String],
    age: u32,
    gender: &str,
    race: &str,
    attempt: usize,
) -> String {
    let forbidden = if synonyms.is_empty() {
        String::new()
    } else {
        format!(
            "\nAlso forbidden, as giveaway paraphrases: {}.",
            synonyms.join(", ")
        )
    };

    let retry_guidance = if attempt > 0 {
        "\nRETRY GUIDANCE: the previous draft revealed the condition. Be \
         stricter this time: avoid the condition name and every paraphrase of \
         it entirely, and make the vital signs and measurements more specific \
         so the findings alone carry the diagnosis.\n"
    } else {
        ""
    };

    format!(
        r#"Write a complete SOAP note for the following patient encounter.

Patient: {age}-year-old {gender}, race/ethnicity: {race}.
Underlying condition to imply (NEVER name it): {disease}.{forbidden}
{retry_guidance}
The note must contain SUBJECTIVE, OBJECTIVE, ASSESSMENT, and PLAN sections,
with measured vital signs in the objective section. Do not state or announce
a diagnosis; let the findings speak for themselves."#
    )
}
