//! Error types for execsift.
//!
//! The engine draws a hard line between malformed *input* (a candidate
//! record with no name, a lexicon with no tiers) and poor-quality *data*
//! (wrong domains, redacted emails, excluded titles). Only the former is an
//! error; everything else is a negative result with justification text.

use thiserror::Error;

/// Validation errors that occur while checking input records and
/// configuration data.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing or empty")]
    MissingField {
        field: &'static str,
    },

    #[error("Source confidence {value} is out of range [0.0, 1.0]")]
    ConfidenceOutOfRange {
        value: f32,
    },

    #[error("Invalid title pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: String,
    },

    #[error("Role lexicon '{role}' defines no tiers")]
    EmptyLexicon {
        role: String,
    },

    #[error("Role lexicon '{role}' tier ranks must be ascending and unique (saw {rank} after {previous})")]
    NonAscendingTiers {
        role: String,
        previous: u8,
        rank: u8,
    },

    #[error("Company canonical domain cannot be empty")]
    EmptyDomain,

    #[error("Invalid mislabel rule '{rule}': {reason}")]
    InvalidMislabelRule {
        rule: String,
        reason: String,
    },
}

/// Top-level error type for execsift.
///
/// Data-quality findings never appear here: an unfilled role, an excluded
/// candidate, or a cleared contact field are ordinary results.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl SiftError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for execsift operations.
pub type SiftResult<T> = Result<T, SiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::MissingField { field: "name" };
        let msg = format!("{err}");
        assert!(msg.contains("name"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_confidence_out_of_range_message() {
        let err = ValidationError::ConfidenceOutOfRange { value: 1.5 };
        let msg = format!("{err}");
        assert!(msg.contains("1.5"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_non_ascending_tiers_message() {
        let err = ValidationError::NonAscendingTiers {
            role: "finance_leader".to_string(),
            previous: 3,
            rank: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("finance_leader"));
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_sift_error_from_validation() {
        let err: SiftError = ValidationError::EmptyDomain.into();
        assert!(err.is_validation());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_sift_error_internal() {
        let err = SiftError::internal("unexpected state");
        assert!(err.is_internal());
        let msg = format!("{err}");
        assert!(msg.contains("unexpected state"));
    }
}
