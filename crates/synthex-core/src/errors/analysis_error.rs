//! Top-level analysis errors.

use super::error_code::{self, SynthexErrorCode};
use super::{ConfigError, InputError};

/// Fatal errors from the statistical engine.
/// Aggregates input and config errors via `From` conversions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Insufficient studies for {operation}: need at least {required}, found {found}")]
    InsufficientStudies {
        operation: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Numeric degeneracy in study {study_id}: {reason}")]
    NumericDegeneracy { study_id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Shorthand for a degeneracy error.
    pub fn degenerate(study_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            study_id: study_id.into(),
            reason: reason.into(),
        }
    }
}

impl SynthexErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::InsufficientStudies { .. } => error_code::INSUFFICIENT_DATA,
            Self::NumericDegeneracy { .. } => error_code::NUMERIC_DEGENERACY,
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result alias used throughout the engine.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
