//! Tests for the Synthex error handling system.

use synthex_core::errors::error_code::{self, SynthexErrorCode};
use synthex_core::errors::*;

#[test]
fn test_error_codes() {
    let input = InputError::NonPositiveSampleSize {
        study_id: "s1".into(),
        arm: "treatment",
        n: 0,
    };
    assert_eq!(input.error_code(), error_code::INPUT_ERROR);

    let config = ConfigError::FileNotFound {
        path: "/tmp/synthex.toml".into(),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);

    let insufficient = AnalysisError::InsufficientStudies {
        operation: "pooling",
        required: 2,
        found: 1,
    };
    assert_eq!(insufficient.error_code(), error_code::INSUFFICIENT_DATA);

    let degenerate = AnalysisError::degenerate("s2", "zero variance");
    assert_eq!(degenerate.error_code(), error_code::NUMERIC_DEGENERACY);
}

#[test]
fn test_from_conversions_keep_inner_code() {
    let input = InputError::EventsExceedTotal {
        study_id: "s1".into(),
        arm: "control",
        events: 12,
        total: 10,
    };
    let err: AnalysisError = input.into();
    assert!(matches!(err, AnalysisError::Input(InputError::EventsExceedTotal { .. })));
    assert_eq!(err.error_code(), error_code::INPUT_ERROR);

    let config = ConfigError::ValidationFailed {
        field: "analysis.model".into(),
        message: "bad".into(),
    };
    let err: AnalysisError = config.into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn test_coded_string_format() {
    let err = AnalysisError::InsufficientStudies {
        operation: "pooling",
        required: 2,
        found: 1,
    };
    assert_eq!(
        err.coded_string(),
        "[INSUFFICIENT_DATA] Insufficient studies for pooling: need at least 2, found 1"
    );

    let input = InputError::NegativeCount {
        study_id: "trial-7".into(),
        arm: "control",
        events: -3,
    };
    assert_eq!(
        input.coded_string(),
        "[INPUT_ERROR] Study trial-7: control event count must be non-negative, got -3"
    );
}
