//! Bayesian Knowledge Tracing update.
//!
//! One observation update per question attempt: condition the mastery
//! belief on the outcome, then apply the learning transition.
//!
//! NOTE: the learning transition `m += pT * (1 - m)` is applied only after
//! an *incorrect* answer. Textbook BKT applies it after every attempt.
//! Stored mastery trajectories depend on this asymmetry; a fix must update
//! `learning_transition_only_follows_wrong_answers` along with it.

use crate::config::BktParams;

/// Applies BKT observation updates with fixed parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MasteryEstimator {
    params: BktParams,
}

impl MasteryEstimator {
    pub fn new(params: BktParams) -> Self {
        Self { params }
    }

    /// Posterior mastery after one attempt.
    ///
    /// `current_mastery` must already lie in [0, 1]; the caller validates it.
    /// The result is always clamped to [0, 1]. A zero-probability outcome
    /// leaves the mastery unchanged before the learning step.
    pub fn update(&self, current_mastery: f64, is_correct: bool) -> f64 {
        let BktParams {
            learn, guess, slip, ..
        } = self.params;

        let mut mastery = if is_correct {
            let given_known = (1.0 - slip) * current_mastery;
            let given_unknown = guess * (1.0 - current_mastery);
            posterior(given_known, given_known + given_unknown, current_mastery)
        } else {
            let given_known = slip * current_mastery;
            let given_unknown = (1.0 - guess) * (1.0 - current_mastery);
            posterior(given_known, given_known + given_unknown, current_mastery)
        };

        if !is_correct {
            mastery += learn * (1.0 - mastery);
        }

        mastery.clamp(0.0, 1.0)
    }
}

fn posterior(joint: f64, evidence: f64, fallback: f64) -> f64 {
    if evidence > 0.0 {
        joint / evidence
    } else {
        fallback
    }
}
