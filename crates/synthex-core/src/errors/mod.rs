//! Error handling for Synthex.
//! One error enum per concern, `thiserror` only, zero `anyhow`.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod input_error;

pub use analysis_error::{AnalysisError, AnalysisResult};
pub use config_error::ConfigError;
pub use error_code::SynthexErrorCode;
pub use input_error::InputError;
