//! Error taxonomy
//!
//! Only two conditions are errors at all: a bad configuration handed to
//! session start, and an internal invariant breaking. Rejected user input
//! (illegal puzzle move, spent token, jump while airborne) is normal
//! gameplay and is silently ignored by the simulations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid level dimensions or durations supplied at session start.
    /// Reported before any tick runs; the session is never constructed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A state the movement/collision model guarantees cannot happen.
    /// Programming-defect class; terminates the session, never swallowed.
    #[error("simulation invariant violated: {detail}")]
    InvariantViolation { detail: String },
}

impl SimError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        SimError::InvariantViolation {
            detail: detail.into(),
        }
    }
}
