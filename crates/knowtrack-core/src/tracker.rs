//! One question attempt, start to finish.
//!
//! Runs the mastery update and the review scheduling for a single record
//! and returns the updated copy. Storing it, and serializing updates to the
//! same concept, is up to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::RecordError;
use crate::estimator::MasteryEstimator;
use crate::ledger::classify;
use crate::model::{AttemptInput, ConceptMasteryRecord, MasteryLabel};
use crate::scheduler::ReviewScheduler;
use crate::timestamp::Timestamp;

/// Result of applying one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptUpdate {
    /// The record after the attempt.
    #[serde(flatten)]
    pub record: ConceptMasteryRecord,
    /// Band of the new mastery.
    pub mastery_label: MasteryLabel,
    /// SM-2 quality used for scheduling.
    pub quality: u8,
}

/// Bundles the estimator and scheduler built from one config.
#[derive(Debug, Clone)]
pub struct ConceptTracker {
    config: TrackerConfig,
    estimator: MasteryEstimator,
    scheduler: ReviewScheduler,
}

impl Default for ConceptTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl ConceptTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            estimator: MasteryEstimator::new(config.bkt),
            scheduler: ReviewScheduler::new(config.scheduler),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// A fresh record seeded with the configured prior.
    pub fn new_record(&self, concept_id: impl Into<String>) -> ConceptMasteryRecord {
        ConceptMasteryRecord::with_schedule(
            concept_id,
            self.config.bkt.prior_knowledge,
            self.config.scheduler.min_interval_days,
            self.config.scheduler.initial_ease_factor,
        )
    }

    /// Apply one attempt observed at `now`.
    pub fn record_attempt(
        &self,
        record: &ConceptMasteryRecord,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> AttemptUpdate {
        let mastery = self
            .estimator
            .update(record.mastery_probability, is_correct);
        let reviewed = Timestamp::At(now);
        let schedule = self.scheduler.next_review(
            mastery,
            Some(&reviewed),
            record.interval,
            record.ease_factor,
            now,
        );

        tracing::debug!(
            concept = %record.concept_id,
            is_correct,
            from = record.mastery_probability,
            to = mastery,
            quality = schedule.quality,
            interval = schedule.interval,
            "attempt recorded"
        );

        AttemptUpdate {
            record: ConceptMasteryRecord {
                concept_id: record.concept_id.clone(),
                mastery_probability: mastery,
                attempts: record.attempts.saturating_add(1),
                correct_attempts: record
                    .correct_attempts
                    .saturating_add(u32::from(is_correct))
                    .min(record.attempts.saturating_add(1)),
                last_reviewed: Some(reviewed),
                next_review_date: Some(Timestamp::At(schedule.next_review_date)),
                interval: schedule.interval,
                ease_factor: schedule.ease_factor,
            },
            mastery_label: classify(mastery),
            quality: schedule.quality,
        }
    }

    /// Validate a boundary attempt and apply it.
    pub fn apply(&self, input: &AttemptInput, now: DateTime<Utc>) -> Result<AttemptUpdate, RecordError> {
        let record = input.to_record(&self.config)?;
        Ok(self.record_attempt(&record, input.is_correct, now))
    }
}
