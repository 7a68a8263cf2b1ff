//! # synthex-core
//!
//! Foundation crate for the Synthex meta-analysis engine.
//! Defines errors, error codes, config, tracing setup, and constants.
//! `synthex-analysis` depends on this; it has no statistical code of its own.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::SynthexConfig;
pub use errors::{AnalysisError, AnalysisResult, ConfigError, InputError};
