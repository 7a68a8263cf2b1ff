//! Top-level Synthex configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, BiasConfig, ForestConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Name of the project-level config file.
pub const CONFIG_FILE_NAME: &str = "synthex.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`SYNTHEX_*`)
/// 2. Project config (`synthex.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SynthexConfig {
    pub analysis: AnalysisConfig,
    pub bias: BiasConfig,
    pub forest: ForestConfig,
}

impl SynthexConfig {
    /// Load configuration for a project root.
    ///
    /// A missing `synthex.toml` is not an error; compiled defaults apply.
    /// `SYNTHEX_*` environment variables are read here and only here. This
    /// is a convenience for hosting binaries: the analysis crate never calls
    /// `load` and takes a `SynthexConfig` value or explicit options instead.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        tracing::debug!(path = %project_config_path.display(), "loaded synthex config");
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &SynthexConfig) -> Result<(), ConfigError> {
        if let Some(level) = config.analysis.confidence_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(invalid("analysis.confidence_level", "must be in (0, 1)"));
            }
        }
        if let Some(cc) = config.analysis.continuity_correction {
            if !cc.is_finite() || cc < 0.0 {
                return Err(invalid(
                    "analysis.continuity_correction",
                    "must be a non-negative number",
                ));
            }
        }
        if let Some(ref model) = config.analysis.model {
            if !constants::MODEL_NAMES.contains(&model.as_str()) {
                return Err(invalid(
                    "analysis.model",
                    "must be one of fixed, random, auto",
                ));
            }
        }
        if let Some(t) = config.analysis.auto_i_squared_threshold {
            if !(0.0..=100.0).contains(&t) {
                return Err(invalid(
                    "analysis.auto_i_squared_threshold",
                    "must be between 0 and 100",
                ));
            }
        }
        if let Some(p) = config.analysis.auto_q_p_threshold {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(
                    "analysis.auto_q_p_threshold",
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        for (field, alpha) in [
            ("bias.screening_alpha", config.bias.screening_alpha),
            ("bias.strong_alpha", config.bias.strong_alpha),
        ] {
            if let Some(a) = alpha {
                if !(a > 0.0 && a < 1.0) {
                    return Err(invalid(field, "must be in (0, 1)"));
                }
            }
        }
        if let (Some(strong), Some(screen)) =
            (config.bias.strong_alpha, config.bias.screening_alpha)
        {
            if strong > screen {
                return Err(invalid(
                    "bias.strong_alpha",
                    "must not exceed bias.screening_alpha",
                ));
            }
        }
        if let Some(ref order) = config.forest.order {
            if !constants::FOREST_ORDER_NAMES.contains(&order.as_str()) {
                return Err(invalid(
                    "forest.order",
                    "must be one of original, by_year, by_weight, by_effect, alphabetical",
                ));
            }
        }
        if config.forest.target_ticks == Some(0) {
            return Err(invalid("forest.target_ticks", "must be greater than 0"));
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut SynthexConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SynthexConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut SynthexConfig, other: &SynthexConfig) {
        let a = &other.analysis;
        if a.confidence_level.is_some() {
            base.analysis.confidence_level = a.confidence_level;
        }
        if a.continuity_correction.is_some() {
            base.analysis.continuity_correction = a.continuity_correction;
        }
        if a.model.is_some() {
            base.analysis.model = a.model.clone();
        }
        if a.auto_i_squared_threshold.is_some() {
            base.analysis.auto_i_squared_threshold = a.auto_i_squared_threshold;
        }
        if a.auto_q_p_threshold.is_some() {
            base.analysis.auto_q_p_threshold = a.auto_q_p_threshold;
        }

        let b = &other.bias;
        if b.min_studies.is_some() {
            base.bias.min_studies = b.min_studies;
        }
        if b.screening_alpha.is_some() {
            base.bias.screening_alpha = b.screening_alpha;
        }
        if b.strong_alpha.is_some() {
            base.bias.strong_alpha = b.strong_alpha;
        }

        let f = &other.forest;
        if f.order.is_some() {
            base.forest.order = f.order.clone();
        }
        if f.target_ticks.is_some() {
            base.forest.target_ticks = f.target_ticks;
        }
    }

    /// Apply environment variable overrides.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut SynthexConfig) {
        if let Ok(val) = std::env::var("SYNTHEX_CONFIDENCE_LEVEL") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.confidence_level = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SYNTHEX_CONTINUITY_CORRECTION") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.continuity_correction = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SYNTHEX_MODEL") {
            config.analysis.model = Some(val.trim().to_lowercase());
        }
        if let Ok(val) = std::env::var("SYNTHEX_BIAS_MIN_STUDIES") {
            if let Ok(v) = val.parse::<usize>() {
                config.bias.min_studies = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SYNTHEX_FOREST_ORDER") {
            config.forest.order = Some(val.trim().to_lowercase());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
