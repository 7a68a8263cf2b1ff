//! SynthexErrorCode trait for hosting layers.

/// Structured error codes for callers that surface errors across a
/// process or language boundary (report generators, orchestration layers).
pub trait SynthexErrorCode {
    /// Returns the error code string (e.g., "INPUT_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INPUT_ERROR: &str = "INPUT_ERROR";
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const NUMERIC_DEGENERACY: &str = "NUMERIC_DEGENERACY";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
