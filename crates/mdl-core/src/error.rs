#![forbid(unsafe_code)]

//! Error taxonomy for property mutation.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | [`UnknownPropertyError`] | Name absent from the registry | Whole batch rejected before any mutation |
//! | [`ApplicationError`] | Value fails its kind/range check | Earlier entries of the batch stay applied |
//! | [`ConfigError`] | Out-of-range or unparsable configuration | Config rejected, nothing constructed |

use std::fmt;

/// A property name that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPropertyError {
    pub name: String,
}

impl UnknownPropertyError {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for UnknownPropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown property '{}'", self.name)
    }
}

impl std::error::Error for UnknownPropertyError {}

/// A value rejected while applying one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationError {
    pub property: &'static str,
    pub reason: String,
}

impl ApplicationError {
    #[must_use]
    pub fn new(property: &'static str, reason: impl Into<String>) -> Self {
        Self {
            property,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply '{}': {}", self.property, self.reason)
    }
}

impl std::error::Error for ApplicationError {}

/// Any failure of a property mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    Unknown(UnknownPropertyError),
    Application(ApplicationError),
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(e) => e.fmt(f),
            Self::Application(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for PropertyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unknown(e) => Some(e),
            Self::Application(e) => Some(e),
        }
    }
}

impl From<UnknownPropertyError> for PropertyError {
    fn from(e: UnknownPropertyError) -> Self {
        Self::Unknown(e)
    }
}

impl From<ApplicationError> for PropertyError {
    fn from(e: ApplicationError) -> Self {
        Self::Application(e)
    }
}

/// A configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds an out-of-range value.
    Invalid { field: &'static str, reason: String },
    /// A config document could not be decoded.
    Parse(String),
}

impl ConfigError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { field, reason } => write!(f, "invalid config '{field}': {reason}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
