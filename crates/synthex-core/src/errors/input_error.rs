//! Input validation errors.
//!
//! Raised before any computation starts; no partial result accompanies them.

use super::error_code::{self, SynthexErrorCode};

/// Malformed or out-of-range study data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Study {study_id}: {arm} sample size must be positive, got {n}")]
    NonPositiveSampleSize {
        study_id: String,
        arm: &'static str,
        n: i64,
    },

    #[error("Study {study_id}: {arm} event count must be non-negative, got {events}")]
    NegativeCount {
        study_id: String,
        arm: &'static str,
        events: i64,
    },

    #[error("Study {study_id}: {arm} events ({events}) exceed total ({total})")]
    EventsExceedTotal {
        study_id: String,
        arm: &'static str,
        events: i64,
        total: i64,
    },

    #[error("Study {study_id}: {arm} standard deviation must be non-negative, got {sd}")]
    NegativeStandardDeviation {
        study_id: String,
        arm: &'static str,
        sd: f64,
    },

    #[error("Study {study_id}: field {field} is not a finite number")]
    NonFiniteValue {
        study_id: String,
        field: &'static str,
    },

    #[error("Study {study_id}: standard error must be positive, got {se}")]
    NonPositiveStandardError { study_id: String, se: f64 },

    #[error("Study {study_id}: {measure} requires a positive ratio, got {value}")]
    NonPositiveRatio {
        study_id: String,
        measure: String,
        value: f64,
    },

    #[error("Study {study_id}: {measure} cannot be computed from {data_kind} data")]
    IncompatibleMeasure {
        study_id: String,
        measure: String,
        data_kind: &'static str,
    },

    #[error("Study {study_id}: expected measure {expected}, found {found}")]
    MixedMeasures {
        study_id: String,
        expected: String,
        found: String,
    },

    #[error("Study {study_id}: not part of the pooled result")]
    UnknownStudy { study_id: String },

    #[error("Duplicate study id: {study_id}")]
    DuplicateStudyId { study_id: String },

    #[error("Invalid option {field}: {message}")]
    InvalidOption { field: String, message: String },
}

impl SynthexErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        error_code::INPUT_ERROR
    }
}
