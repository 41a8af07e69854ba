//! Exam risk scoring.
//!
//! Five independent factors each add a fixed weight to the risk score:
//! current average, predicted exam score, score trend, consistency, and
//! improvement rate. The sum is clamped to [0, 1].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;

const LOW_AVERAGE: f64 = 60.0;
const BORDERLINE_AVERAGE: f64 = 70.0;
const STEEP_DECLINE_SLOPE: f64 = -1.0;
const MIN_CONSISTENCY: f64 = 0.6;
const MIN_IMPROVEMENT_RATE: f64 = 0.5;

/// Coarse risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::Low => write!(f, "low"),
        }
    }
}

/// Score history snapshot for one learner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    /// Current percentage score per subject.
    #[serde(default)]
    pub current_scores: BTreeMap<String, f64>,
    /// Past scores, oldest first.
    #[serde(default)]
    pub score_trend: Vec<f64>,
    /// 0-1, higher is more consistent.
    pub consistency: f64,
    /// Percentage points gained per week.
    pub improvement_rate: f64,
    #[serde(default)]
    pub weeks_until_exam: Option<u32>,
}

/// Computed risk for one learner. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub predicted_score: f64,
    pub current_average_score: f64,
    pub trend_slope: f64,
    pub weeks_until_exam: u32,
    /// Triggered factors in evaluation order.
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Scores exam risk with configured thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
}

impl RiskAssessor {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Assess a [`RiskInput`], defaulting the exam horizon from config.
    pub fn assess(&self, input: &RiskInput) -> RiskAssessment {
        self.calculate_risk_score(
            &input.current_scores,
            &input.score_trend,
            input.consistency,
            input.improvement_rate,
            input
                .weeks_until_exam
                .unwrap_or(self.config.default_weeks_until_exam),
        )
    }

    pub fn calculate_risk_score(
        &self,
        current_scores: &BTreeMap<String, f64>,
        score_trend: &[f64],
        consistency: f64,
        improvement_rate: f64,
        weeks_until_exam: u32,
    ) -> RiskAssessment {
        let avg_score = mean(current_scores.values().copied());
        let trend_slope = least_squares_slope(score_trend);
        let predicted_score = avg_score + improvement_rate * weeks_until_exam as f64;

        let mut risk_score: f64 = 0.0;
        let mut risk_factors = Vec::new();

        if avg_score < LOW_AVERAGE {
            risk_score += 0.4;
            risk_factors.push("Current average score is below 60%".to_string());
        } else if avg_score < BORDERLINE_AVERAGE {
            risk_score += 0.2;
            risk_factors.push("Current average score is below 70%".to_string());
        }

        if predicted_score < self.config.passing_score {
            risk_score += 0.3;
            risk_factors.push(format!(
                "Predicted score ({predicted_score:.1}%) is below passing threshold"
            ));
        }

        if trend_slope < STEEP_DECLINE_SLOPE {
            risk_score += 0.2;
            risk_factors.push("Performance is declining".to_string());
        } else if trend_slope < 0.0 {
            risk_score += 0.1;
            risk_factors.push("Performance is slightly declining".to_string());
        }

        if consistency < MIN_CONSISTENCY {
            risk_score += 0.1;
            risk_factors.push("Inconsistent performance".to_string());
        }

        if improvement_rate < MIN_IMPROVEMENT_RATE {
            risk_score += 0.1;
            risk_factors.push("Low improvement rate".to_string());
        }

        let risk_score = risk_score.clamp(0.0, 1.0);
        let risk_level = self.level_for(risk_score);
        let recommendations = self.recommendations(risk_score, avg_score, predicted_score);

        tracing::debug!(
            risk_score,
            %risk_level,
            predicted_score,
            factors = risk_factors.len(),
            "risk assessed"
        );

        RiskAssessment {
            risk_score,
            risk_level,
            predicted_score,
            current_average_score: avg_score,
            trend_slope,
            weeks_until_exam,
            risk_factors,
            recommendations,
        }
    }

    fn level_for(&self, risk_score: f64) -> RiskLevel {
        if risk_score >= self.config.high_risk_threshold {
            RiskLevel::High
        } else if risk_score >= self.config.medium_risk_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn recommendations(&self, risk_score: f64, avg_score: f64, predicted_score: f64) -> Vec<String> {
        let tier: &[&str] = if risk_score >= self.config.high_risk_threshold {
            &[
                "URGENT: Schedule a meeting with your instructor",
                "Increase study time to at least 3-4 hours per day",
                "Focus on fundamental concepts before advanced topics",
                "Consider joining a study group or seeking tutoring",
            ]
        } else if risk_score >= self.config.medium_risk_threshold {
            &[
                "Increase study time to 2-3 hours per day",
                "Focus on your weakest subjects first",
                "Review past tests and understand mistakes",
                "Set up a consistent study schedule",
            ]
        } else {
            &[
                "Maintain current study habits",
                "Continue focusing on areas for improvement",
                "Take practice tests regularly",
            ]
        };

        let mut recommendations: Vec<String> = tier.iter().map(|s| s.to_string()).collect();

        if avg_score < BORDERLINE_AVERAGE {
            recommendations.push("Prioritize review of basic concepts".to_string());
        }

        let passing = self.config.passing_score;
        if predicted_score < passing {
            recommendations.push(format!(
                "Need to improve by {:.1}% to pass",
                passing - predicted_score
            ));
        }

        recommendations
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Slope of the least-squares line through `(index, value)` points.
/// Fewer than two points give `0.0`.
pub fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    num / den
}
