//! Configuration system for Synthex.
//! TOML-based, 3-layer resolution: env > project file > defaults.

pub mod analysis_config;
pub mod bias_config;
pub mod forest_config;
pub mod synthex_config;

pub use analysis_config::AnalysisConfig;
pub use bias_config::BiasConfig;
pub use forest_config::ForestConfig;
pub use synthex_config::SynthexConfig;
