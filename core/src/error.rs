//! Errors produced by the alignment APIs.

use crate::model::ModuleKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AlignError {
    #[error(
        "[SIGNALIGN_001] {kind} group '{group}' left unmatched modules on both sides (left={left}, right={right}). Suggestion: report this pair of signs; the alignment degrades to coding order when `on_invariant_violation` is `degrade`."
    )]
    InvariantViolation {
        kind: ModuleKind,
        group: String,
        left: usize,
        right: usize,
    },

    #[error("[SIGNALIGN_002] sign '{gloss}' is not usable for alignment: {message}")]
    InvalidSign { gloss: String, message: String },
}

impl AlignError {
    pub fn code(&self) -> &'static str {
        match self {
            AlignError::InvariantViolation { .. } => "SIGNALIGN_001",
            AlignError::InvalidSign { .. } => "SIGNALIGN_002",
        }
    }
}
