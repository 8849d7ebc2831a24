pub mod types;

mod engine;

pub use engine::DifferentialEvaluator;
pub use types::*;

use thiserror::Error;

use crate::generator::GenerationError;

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("model invocation failed: {0}")]
    Collaborator(#[from] GenerationError),
}
