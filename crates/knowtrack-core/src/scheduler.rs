//! SM-2 review scheduling driven by mastery.
//!
//! Classic SM-2 asks the learner to grade their own recall. Here the recall
//! grade ("quality") is derived from the mastery probability instead, so the
//! schedule follows the BKT estimate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::model::ConceptMasteryRecord;
use crate::timestamp::{due_status, review_baseline, DueStatus, Timestamp};

/// Quality at or above which a review counts as a pass.
pub const PASSING_QUALITY: u8 = 3;

/// Outcome of scheduling one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub next_review_date: DateTime<Utc>,
    /// Days until the next review.
    pub interval: u32,
    pub ease_factor: f64,
    /// Recall grade 1-5 derived from mastery.
    pub quality: u8,
}

/// A record that is due for review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DueConcept<'a> {
    pub record: &'a ConceptMasteryRecord,
    pub days_overdue: i64,
}

/// Map mastery to an SM-2 quality grade.
pub fn quality_for(mastery: f64) -> u8 {
    if mastery >= 0.9 {
        5
    } else if mastery >= 0.7 {
        4
    } else if mastery >= 0.5 {
        3
    } else if mastery >= 0.3 {
        2
    } else {
        1
    }
}

/// Computes review intervals and due lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Schedule the next review after a mastery update.
    ///
    /// A missing or malformed `last_review` is treated as `now`.
    pub fn next_review(
        &self,
        current_mastery: f64,
        last_review: Option<&Timestamp>,
        current_interval: u32,
        ease_factor: f64,
        now: DateTime<Utc>,
    ) -> ReviewSchedule {
        let baseline = review_baseline(last_review, now);
        let quality = quality_for(current_mastery);
        let cfg = &self.config;

        let (raw_interval, ease_factor) = if quality < PASSING_QUALITY {
            (
                cfg.min_interval_days as f64,
                (ease_factor - 0.2).max(cfg.min_ease_factor),
            )
        } else {
            let interval = if current_interval == 0 {
                cfg.min_interval_days as f64
            } else if current_interval == cfg.min_interval_days {
                cfg.second_interval_days as f64
            } else {
                (current_interval as f64 * ease_factor).floor()
            };
            let q = (5 - quality) as f64;
            let adjusted = ease_factor + (0.1 - q * (0.08 + q * 0.02));
            (interval, adjusted.max(cfg.min_ease_factor))
        };

        let interval = raw_interval.clamp(
            cfg.min_interval_days as f64,
            cfg.max_interval_days as f64,
        ) as u32;

        ReviewSchedule {
            next_review_date: baseline + Duration::days(interval as i64),
            interval,
            ease_factor,
            quality,
        }
    }

    /// Records due at `now`, most overdue first. Ties keep input order.
    ///
    /// Records without a review date are skipped. Malformed dates count as
    /// due with the sentinel overdue value.
    pub fn due_concepts<'a>(
        &self,
        records: &'a [ConceptMasteryRecord],
        now: DateTime<Utc>,
    ) -> Vec<DueConcept<'a>> {
        let mut due: Vec<DueConcept<'a>> = records
            .iter()
            .filter_map(|record| {
                let next = record.next_review_date.as_ref()?;
                if let Timestamp::Malformed(raw) = next {
                    tracing::warn!(
                        "unparseable review date '{raw}' for {}, treating as due",
                        record.concept_id
                    );
                }
                match due_status(next, now) {
                    DueStatus::Due { days_overdue } => Some(DueConcept {
                        record,
                        days_overdue,
                    }),
                    DueStatus::NotDue => None,
                }
            })
            .collect();

        due.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
        due
    }
}
