#![forbid(unsafe_code)]

//! Layout knobs for the default document builder.

use mdl_core::error::ConfigError;

/// Configuration for [`DocumentBuilder`](crate::DocumentBuilder).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuilderConfig {
    /// Font-size multipliers for heading levels 1 through 6.
    /// Default: `[2.0, 1.5, 1.17, 1.0, 0.83, 0.67]`
    pub heading_scales: [f64; 6],

    /// Marker text for bullet list items.
    /// Default: `"•"`
    pub bullet: String,

    /// Marker template for ordered list items. `{n}` is replaced by the
    /// item number.
    /// Default: `"{n}."`
    pub ordered_marker: String,

    /// Font-size multiplier for code spans and code blocks.
    /// Default: 1.0
    pub code_scale: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            heading_scales: [2.0, 1.5, 1.17, 1.0, 0.83, 0.67],
            bullet: "•".to_owned(),
            ordered_marker: "{n}.".to_owned(),
            code_scale: 1.0,
        }
    }
}

impl BuilderConfig {
    #[must_use]
    pub fn with_heading_scales(mut self, scales: [f64; 6]) -> Self {
        self.heading_scales = scales;
        self
    }

    #[must_use]
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }

    #[must_use]
    pub fn with_ordered_marker(mut self, template: impl Into<String>) -> Self {
        self.ordered_marker = template.into();
        self
    }

    #[must_use]
    pub fn with_code_scale(mut self, scale: f64) -> Self {
        self.code_scale = scale;
        self
    }

    /// Scale for heading `level`; out-of-range levels clamp to 1..=6.
    #[must_use]
    pub fn heading_scale(&self, level: u8) -> f64 {
        let index = usize::from(level.clamp(1, 6)) - 1;
        self.heading_scales[index]
    }

    /// Marker text for item `n` of an ordered list.
    #[must_use]
    pub fn ordered_marker_for(&self, n: u64) -> String {
        self.ordered_marker.replace("{n}", &n.to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for scale in self.heading_scales {
            check_scale("heading_scales", scale)?;
        }
        check_scale("code_scale", self.code_scale)?;
        if self.bullet.is_empty() {
            return Err(ConfigError::invalid("bullet", "must not be empty"));
        }
        if !self.ordered_marker.contains("{n}") {
            return Err(ConfigError::invalid(
                "ordered_marker",
                "template must contain {n}",
            ));
        }
        Ok(())
    }
}

fn check_scale(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} is not a positive number"),
        ))
    }
}
