//! Pooling: fixed-effect and DerSimonian–Laird random-effects synthesis.
//!
//! Model "auto" resolves deterministically: random effects when I² exceeds
//! the threshold (default 50%) or Q's p-value falls below the threshold
//! (default 0.10), fixed effect otherwise.

pub mod engine;
pub mod sensitivity;
pub mod types;

pub use engine::{PoolingEngine, PoolingOptions};
pub use sensitivity::{LeaveOneOut, SensitivityAnalysis};
pub use types::{
    ModelChoice, ModelSelection, PooledResult, PoolingModel, SelectionReason, StudyEffect,
    StudyWeight,
};
