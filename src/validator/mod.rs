pub mod types;

mod authenticity;
mod disease;
mod engine;
mod specificity;
mod structure;

pub use engine::{summarize, BatchSummary, DocumentValidator, VALID_SCORE_THRESHOLD};
pub use types::*;
