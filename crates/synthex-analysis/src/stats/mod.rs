//! Shared numerical helpers: distribution functions, inverse-variance
//! weighting, and rank correlation.

pub mod distributions;
pub mod rank;
pub mod weighted;

pub use distributions::{
    chi_squared_sf, normal_cdf, normal_two_sided_p, t_critical, t_two_sided_p, z_critical,
};
pub use rank::{kendall_tau_b, KendallTau};
pub use weighted::{inverse_variance, InverseVarianceSummary};
