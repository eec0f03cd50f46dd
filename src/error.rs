//! Error types for the deployer property resolver.
//!
//! Resolution failures are split into three kinds of [`PropertyError`]:
//! malformed values, conflicting configuration and out-of-range integers.
//! A single resolution pass collects every one of them into a
//! [`ResolutionError`] so callers see all problems at once.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the deployer property tooling.
#[derive(Debug, Error)]
pub enum DeployerError {
    /// One or more properties failed to resolve.
    #[error("Property resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// A property source could not be loaded.
    #[error("Property source error: {0}")]
    Source(#[from] SourceError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single problem with one property value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropertyError {
    /// The raw value does not match the key's grammar.
    #[error("Malformed value for '{key}': '{value}' ({reason})")]
    MalformedValue {
        /// Property key name.
        key: String,
        /// Offending substring.
        value: String,
        /// What was expected.
        reason: String,
    },

    /// The value is well-formed but contradicts itself.
    #[error("Conflicting configuration for '{key}': '{value}' ({reason})")]
    ConflictingConfiguration {
        /// Property key name.
        key: String,
        /// Offending substring.
        value: String,
        /// Description of the conflict.
        reason: String,
    },

    /// An integer lies outside its valid domain.
    #[error("Value for '{key}' out of range: '{value}' (expected {min}..={max})")]
    OutOfRange {
        /// Property key name.
        key: String,
        /// Offending substring.
        value: String,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
}

/// Discriminant of a [`PropertyError`], handy for assertions and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyErrorKind {
    /// See [`PropertyError::MalformedValue`].
    MalformedValue,
    /// See [`PropertyError::ConflictingConfiguration`].
    ConflictingConfiguration,
    /// See [`PropertyError::OutOfRange`].
    OutOfRange,
}

/// Every error collected during one resolution pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    errors: Vec<PropertyError>,
}

/// Property source loading errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The property file was not found.
    #[error("Property file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The property file could not be parsed.
    #[error("Failed to parse property source: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// Result type alias for deployer property operations.
pub type Result<T> = std::result::Result<T, DeployerError>;

impl PropertyError {
    /// Creates a malformed value error.
    #[must_use]
    pub fn malformed(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a conflicting configuration error.
    #[must_use]
    pub fn conflicting(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConflictingConfiguration {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an out of range error.
    #[must_use]
    pub fn out_of_range(key: impl Into<String>, value: impl Into<String>, min: u32, max: u32) -> Self {
        Self::OutOfRange {
            key: key.into(),
            value: value.into(),
            min,
            max,
        }
    }

    /// Returns the property key this error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MalformedValue { key, .. }
            | Self::ConflictingConfiguration { key, .. }
            | Self::OutOfRange { key, .. } => key,
        }
    }

    /// Returns the offending substring.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::MalformedValue { value, .. }
            | Self::ConflictingConfiguration { value, .. }
            | Self::OutOfRange { value, .. } => value,
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> PropertyErrorKind {
        match self {
            Self::MalformedValue { .. } => PropertyErrorKind::MalformedValue,
            Self::ConflictingConfiguration { .. } => PropertyErrorKind::ConflictingConfiguration,
            Self::OutOfRange { .. } => PropertyErrorKind::OutOfRange,
        }
    }
}

impl ResolutionError {
    /// Wraps the collected errors, or returns `None` when there are none.
    #[must_use]
    pub fn from_errors(errors: Vec<PropertyError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Returns all collected errors in key table order.
    #[must_use]
    pub fn errors(&self) -> &[PropertyError] {
        &self.errors
    }

    /// Returns the number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors reported for one key.
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a PropertyError> + 'a {
        self.errors.iter().filter(move |e| e.key() == key)
    }

    /// Consumes the aggregate and returns the errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<PropertyError> {
        self.errors
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid propert", self.errors.len())?;
        f.write_str(if self.errors.len() == 1 { "y" } else { "ies" })?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolutionError {}

impl fmt::Display for PropertyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MalformedValue => "MalformedValue",
            Self::ConflictingConfiguration => "ConflictingConfiguration",
            Self::OutOfRange => "OutOfRange",
        })
    }
}
