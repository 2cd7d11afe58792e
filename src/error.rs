//! Errors for the configuration surface (tuning and layout JSON)
//!
//! The simulation itself never fails; only data handed in from outside can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
