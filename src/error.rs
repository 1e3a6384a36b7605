//! Error types
//!
//! Only [`ExtractError`] ever reaches a caller. Missing fields are not errors
//! at all, and [`HeuristicMismatch`] is swallowed by the check that raised it.

use thiserror::Error;

/// Failure to produce a post record.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No enclosing post entity could be located from the starting point.
    #[error("no post could be located from the starting point")]
    NotFound,
    #[error("invalid anchor selector: {0}")]
    InvalidSelector(String),
    #[error("invalid extraction request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

/// A best-effort structural check found a shape it did not expect.
#[derive(Debug, Error)]
#[error("{check}: expected {expected}")]
pub struct HeuristicMismatch {
    pub check: &'static str,
    pub expected: &'static str,
}

impl HeuristicMismatch {
    pub(crate) const fn new(check: &'static str, expected: &'static str) -> Self {
        Self { check, expected }
    }
}

/// Resolve a best-effort check, degrading any mismatch to `false`.
pub(crate) fn settle(result: Result<bool, HeuristicMismatch>) -> bool {
    match result {
        Ok(flag) => flag,
        Err(mismatch) => {
            tracing::debug!(
                check = mismatch.check,
                expected = mismatch.expected,
                "heuristic skipped"
            );
            false
        }
    }
}
