//! Boundary error types.
//!
//! The estimator, ledger, scheduler, and risk assessor are total functions
//! and never fail. These errors only arise when converting loosely shaped
//! caller data into validated records, or when a configuration carries
//! values the components cannot work with.

use thiserror::Error;

/// Errors raised while converting caller-supplied data into a
/// [`ConceptMasteryRecord`](crate::model::ConceptMasteryRecord).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// The concept identifier was empty or whitespace.
    #[error("concept id must not be empty")]
    EmptyConceptId,

    /// Mastery probability was outside [0, 1] or not a finite number.
    #[error("mastery probability {value} for '{concept_id}' is outside [0, 1]")]
    MasteryOutOfRange { concept_id: String, value: f64 },

    /// More correct attempts than total attempts.
    #[error("'{concept_id}' has {correct} correct attempts but only {attempts} attempts")]
    CorrectExceedsAttempts {
        concept_id: String,
        correct: u32,
        attempts: u32,
    },

    /// Review interval outside the configured bounds.
    #[error("interval {interval} for '{concept_id}' is outside [{min}, {max}] days")]
    IntervalOutOfRange {
        concept_id: String,
        interval: u32,
        min: u32,
        max: u32,
    },

    /// Ease factor below the configured floor or not finite.
    #[error("ease factor {value} for '{concept_id}' is below the minimum of {min}")]
    EaseFactorTooLow {
        concept_id: String,
        value: f64,
        min: f64,
    },
}

impl RecordError {
    /// The concept the error refers to, if any.
    pub fn concept_id(&self) -> Option<&str> {
        match self {
            RecordError::EmptyConceptId => None,
            RecordError::MasteryOutOfRange { concept_id, .. }
            | RecordError::CorrectExceedsAttempts { concept_id, .. }
            | RecordError::IntervalOutOfRange { concept_id, .. }
            | RecordError::EaseFactorTooLow { concept_id, .. } => Some(concept_id),
        }
    }
}

/// Errors raised by [`TrackerConfig::validate`](crate::config::TrackerConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A probability parameter was outside [0, 1].
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    /// The medium risk threshold sits above the high one.
    #[error("medium risk threshold {medium} exceeds high risk threshold {high}")]
    RiskThresholdsInverted { medium: f64, high: f64 },

    /// The interval bounds are empty or start at zero.
    #[error("invalid interval bounds [{min}, {max}] days")]
    InvalidIntervalBounds { min: u32, max: u32 },

    /// The ease factor floor must be positive.
    #[error("minimum ease factor must be positive, got {0}")]
    InvalidMinEaseFactor(f64),
}
