pub mod types;

mod engine;
mod openai;
mod parser;
mod prompt;

pub use engine::SoapGenerator;
pub use openai::{MockLlmClient, OpenAiClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use parser::parse_soap_sections;
pub use prompt::{build_soap_prompt, SOAP_SYSTEM_PROMPT};
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    /// Fatal configuration problem. Never retried.
    #[error("missing API credential: set {0}")]
    MissingCredential(&'static str),

    #[error("cannot reach model endpoint at {0}")]
    Connection(String),

    #[error("model request timed out after {0}s")]
    Timeout(u64),

    #[error("model endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// Every attempt errored at the collaborator level; carries the last
    /// underlying failure.
    #[error("generation failed after {attempts} attempts: {source}")]
    Failed {
        attempts: usize,
        #[source]
        source: Box<GenerationError>,
    },

    /// Terminal guard: the attempt loop ended with neither a candidate
    /// document nor a recorded collaborator error.
    #[error("no document generated across {attempts} attempts")]
    NoDocument { attempts: usize },

    #[error("generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Transient collaborator failures worth another attempt. Credential
    /// problems and cancellation are final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Api { .. } | Self::MalformedResponse(_)
        )
    }
}
