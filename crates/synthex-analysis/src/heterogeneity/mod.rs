//! Heterogeneity: Cochran's Q, I², H², DerSimonian–Laird τ², and the
//! random-effects prediction interval.
//!
//! τ² has a single implementation (`dersimonian_laird`) shared with pooling.

pub mod assessor;
pub mod types;

pub use assessor::{dersimonian_laird, DerSimonianLaird, HeterogeneityAssessor};
pub use types::{HeterogeneityLevel, HeterogeneityResult, PredictionInterval};
