//! Core data model types for knowtrack.
//!
//! The caller owns and persists every record; the core only reads a record
//! and hands back an updated copy. Loosely shaped input from storage is
//! converted once, at the boundary, into a validated [`ConceptMasteryRecord`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::RecordError;
use crate::timestamp::Timestamp;

/// Per-learner, per-concept mastery state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMasteryRecord {
    /// Opaque concept identifier.
    pub concept_id: String,
    /// Belief that the concept is known, in [0, 1].
    pub mastery_probability: f64,
    /// Total question attempts observed.
    pub attempts: u32,
    /// Attempts answered correctly. Never exceeds `attempts`.
    pub correct_attempts: u32,
    /// When the record was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<Timestamp>,
    /// When the concept should next be reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<Timestamp>,
    /// Current review interval in days.
    pub interval: u32,
    /// SM-2 ease factor.
    pub ease_factor: f64,
}

impl ConceptMasteryRecord {
    /// A fresh record with the given prior mastery and no attempts.
    pub fn new(concept_id: impl Into<String>, prior_mastery: f64) -> Self {
        Self::with_schedule(concept_id, prior_mastery, 1, 2.5)
    }

    pub(crate) fn with_schedule(
        concept_id: impl Into<String>,
        prior_mastery: f64,
        interval: u32,
        ease_factor: f64,
    ) -> Self {
        Self {
            concept_id: concept_id.into(),
            mastery_probability: prior_mastery,
            attempts: 0,
            correct_attempts: 0,
            last_reviewed: None,
            next_review_date: None,
            interval,
            ease_factor,
        }
    }

    /// Share of attempts answered correctly, `0.0` with no attempts.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct_attempts as f64 / self.attempts as f64
        }
    }

    /// Convert loosely shaped storage data into a validated record.
    ///
    /// Missing fields take the configured defaults: the BKT prior for
    /// mastery, the minimum interval, and the initial ease factor.
    pub fn try_from_input(input: RecordInput, config: &TrackerConfig) -> Result<Self, RecordError> {
        let concept_id = input.concept_id.trim().to_string();
        if concept_id.is_empty() {
            return Err(RecordError::EmptyConceptId);
        }

        let record = Self {
            mastery_probability: input
                .mastery_probability
                .unwrap_or(config.bkt.prior_knowledge),
            attempts: input.attempts.unwrap_or(0),
            correct_attempts: input.correct_attempts.unwrap_or(0),
            last_reviewed: stored_timestamp(input.last_reviewed),
            next_review_date: stored_timestamp(input.next_review_date),
            interval: input
                .interval
                .unwrap_or(config.scheduler.min_interval_days),
            ease_factor: input
                .ease_factor
                .unwrap_or(config.scheduler.initial_ease_factor),
            concept_id,
        };
        record.validate(config)?;
        Ok(record)
    }

    /// Check the record invariants against the configured bounds.
    pub fn validate(&self, config: &TrackerConfig) -> Result<(), RecordError> {
        let concept_id = || self.concept_id.clone();

        if !(0.0..=1.0).contains(&self.mastery_probability) {
            return Err(RecordError::MasteryOutOfRange {
                concept_id: concept_id(),
                value: self.mastery_probability,
            });
        }
        if self.correct_attempts > self.attempts {
            return Err(RecordError::CorrectExceedsAttempts {
                concept_id: concept_id(),
                correct: self.correct_attempts,
                attempts: self.attempts,
            });
        }

        let sched = &config.scheduler;
        if self.interval < sched.min_interval_days || self.interval > sched.max_interval_days {
            return Err(RecordError::IntervalOutOfRange {
                concept_id: concept_id(),
                interval: self.interval,
                min: sched.min_interval_days,
                max: sched.max_interval_days,
            });
        }
        if !self.ease_factor.is_finite() || self.ease_factor < sched.min_ease_factor {
            return Err(RecordError::EaseFactorTooLow {
                concept_id: concept_id(),
                value: self.ease_factor,
                min: sched.min_ease_factor,
            });
        }

        Ok(())
    }
}

/// Blank strings mean "never set", same as a missing field.
fn stored_timestamp(raw: Option<String>) -> Option<Timestamp> {
    raw.filter(|s| !s.trim().is_empty()).map(Timestamp::from)
}

/// A mastery record as a storage layer might hand it over: every numeric
/// field optional, dates as free-form strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    pub concept_id: String,
    #[serde(default, alias = "masteryLevel")]
    pub mastery_probability: Option<f64>,
    #[serde(default)]
    pub attempts: Option<u32>,
    #[serde(default)]
    pub correct_attempts: Option<u32>,
    #[serde(default)]
    pub last_reviewed: Option<String>,
    #[serde(default)]
    pub next_review_date: Option<String>,
    #[serde(default)]
    pub interval: Option<u32>,
    #[serde(default)]
    pub ease_factor: Option<f64>,
}

/// One question attempt in the shape callers exchange it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptInput {
    pub concept_id: String,
    pub current_mastery: f64,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub correct_attempts: u32,
    pub is_correct: bool,
    #[serde(default)]
    pub current_interval: Option<u32>,
    #[serde(default)]
    pub ease_factor: Option<f64>,
}

impl AttemptInput {
    /// The record this attempt applies to.
    pub fn to_record(&self, config: &TrackerConfig) -> Result<ConceptMasteryRecord, RecordError> {
        ConceptMasteryRecord::try_from_input(
            RecordInput {
                concept_id: self.concept_id.clone(),
                mastery_probability: Some(self.current_mastery),
                attempts: Some(self.attempts),
                correct_attempts: Some(self.correct_attempts),
                last_reviewed: None,
                next_review_date: None,
                interval: self.current_interval,
                ease_factor: self.ease_factor,
            },
            config,
        )
    }
}

/// Discrete mastery band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLabel {
    Mastered,
    Proficient,
    Developing,
    Beginning,
    Novice,
}

impl MasteryLabel {
    /// All labels, strongest first.
    pub const ALL: [MasteryLabel; 5] = [
        MasteryLabel::Mastered,
        MasteryLabel::Proficient,
        MasteryLabel::Developing,
        MasteryLabel::Beginning,
        MasteryLabel::Novice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLabel::Mastered => "mastered",
            MasteryLabel::Proficient => "proficient",
            MasteryLabel::Developing => "developing",
            MasteryLabel::Beginning => "beginning",
            MasteryLabel::Novice => "novice",
        }
    }
}

impl fmt::Display for MasteryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MasteryLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasteryLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown mastery label: {s}"))
    }
}
