//! Construction-time configuration errors
//!
//! Classification itself never fails; these only surface while building a
//! registry or a classifier config.

use crate::types::Intent;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to parse registry JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("intent `{0}` cannot carry a pattern rule")]
    UnscorableIntent(Intent),

    #[error("intent `{0}` is declared more than once")]
    DuplicateIntent(Intent),

    #[error("empty {field} in rule for intent `{intent}`")]
    EmptyTerm { intent: Intent, field: &'static str },

    #[error("no rule declared for intent `{0}`")]
    MissingIntent(Intent),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse classifier config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fallback intent `{0}` is not a scorable intent")]
    UnscorableFallback(Intent),

    #[error("fallback confidence {0} is above 100")]
    ConfidenceOutOfRange(u8),

    #[error("confidence threshold {0} is above the maximum score of 100")]
    ThresholdOutOfRange(u8),
}
