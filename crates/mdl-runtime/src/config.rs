#![forbid(unsafe_code)]

//! Label configuration.
//!
//! With the `policy-config` feature a [`LabelConfig`] can be loaded from TOML
//! or JSON. Missing fields take their defaults and the result is validated.

use mdl_core::error::ConfigError;
use mdl_markup::config::BuilderConfig;

/// Configuration for a [`MarkdownLabel`](crate::MarkdownLabel).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabelConfig {
    /// Layout knobs for the default document builder.
    pub builder: BuilderConfig,

    /// Rebuilds slower than this many microseconds log a warning.
    /// `None` disables the check.
    /// Default: `Some(16_000)`
    pub slow_rebuild_warn_us: Option<u64>,

    /// Arm a rebuild when the label is created, so the first tick
    /// populates the tree even if no structure property is ever set.
    /// Default: false
    pub arm_on_create: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            builder: BuilderConfig::default(),
            slow_rebuild_warn_us: Some(16_000),
            arm_on_create: false,
        }
    }
}

impl LabelConfig {
    #[must_use]
    pub fn with_builder(mut self, builder: BuilderConfig) -> Self {
        self.builder = builder;
        self
    }

    #[must_use]
    pub fn with_slow_rebuild_warn_us(mut self, threshold: Option<u64>) -> Self {
        self.slow_rebuild_warn_us = threshold;
        self
    }

    #[must_use]
    pub fn with_arm_on_create(mut self, arm: bool) -> Self {
        self.arm_on_create = arm;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.builder.validate()?;
        if self.slow_rebuild_warn_us == Some(0) {
            return Err(ConfigError::invalid(
                "slow_rebuild_warn_us",
                "use None to disable the check",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(LabelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let config = LabelConfig::default().with_slow_rebuild_warn_us(Some(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_errors_surface() {
        let config = LabelConfig::default()
            .with_builder(BuilderConfig::default().with_bullet(""));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "bullet", .. })
        ));
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn toml_overrides_defaults() {
        let config = LabelConfig::from_toml_str(
            r#"
            arm_on_create = true

            [builder]
            bullet = "-"
            "#,
        )
        .unwrap();
        assert!(config.arm_on_create);
        assert_eq!(config.builder.bullet, "-");
        assert_eq!(config.builder.ordered_marker, "{n}.");
        assert_eq!(config.slow_rebuild_warn_us, Some(16_000));
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn json_is_validated() {
        let err = LabelConfig::from_json_str(r#"{"builder": {"code_scale": -1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "code_scale", .. }));
        assert!(matches!(
            LabelConfig::from_json_str("{").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
