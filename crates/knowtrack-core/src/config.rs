//! Tunable parameters and configuration loading.
//!
//! Every component takes its own section at construction time. Nothing in
//! the crate reads global state; a deployment that needs different
//! parameters per tenant simply builds components from different configs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Bayesian Knowledge Tracing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BktParams {
    /// Prior probability that a fresh concept is already known (pL0).
    /// Only used to seed new records; the update rule ignores it.
    #[serde(default = "default_prior_knowledge")]
    pub prior_knowledge: f64,
    /// Probability of learning the concept during an attempt (pT).
    #[serde(default = "default_learn")]
    pub learn: f64,
    /// Probability of answering correctly without knowing (pG).
    #[serde(default = "default_guess")]
    pub guess: f64,
    /// Probability of answering wrong despite knowing (pS).
    #[serde(default = "default_slip")]
    pub slip: f64,
}

fn default_prior_knowledge() -> f64 {
    0.3
}
fn default_learn() -> f64 {
    0.3
}
fn default_guess() -> f64 {
    0.2
}
fn default_slip() -> f64 {
    0.1
}

impl Default for BktParams {
    fn default() -> Self {
        Self {
            prior_knowledge: default_prior_knowledge(),
            learn: default_learn(),
            guess: default_guess(),
            slip: default_slip(),
        }
    }
}

/// SM-2 scheduling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Shortest interval between reviews, in days.
    #[serde(default = "default_min_interval")]
    pub min_interval_days: u32,
    /// Longest interval between reviews, in days.
    #[serde(default = "default_max_interval")]
    pub max_interval_days: u32,
    /// Interval used on the second successful review.
    #[serde(default = "default_second_interval")]
    pub second_interval_days: u32,
    /// Ease factor given to new records.
    #[serde(default = "default_initial_ease")]
    pub initial_ease_factor: f64,
    /// Floor for the ease factor.
    #[serde(default = "default_min_ease")]
    pub min_ease_factor: f64,
}

fn default_min_interval() -> u32 {
    1
}
fn default_max_interval() -> u32 {
    365
}
fn default_second_interval() -> u32 {
    6
}
fn default_initial_ease() -> f64 {
    2.5
}
fn default_min_ease() -> f64 {
    1.3
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval_days: default_min_interval(),
            max_interval_days: default_max_interval(),
            second_interval_days: default_second_interval(),
            initial_ease_factor: default_initial_ease(),
            min_ease_factor: default_min_ease(),
        }
    }
}

/// Exam risk thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Risk score at or above which a learner is high risk.
    #[serde(default = "default_high_risk")]
    pub high_risk_threshold: f64,
    /// Risk score at or above which a learner is medium risk.
    #[serde(default = "default_medium_risk")]
    pub medium_risk_threshold: f64,
    /// Percentage score needed to pass the exam.
    #[serde(default = "default_passing_score")]
    pub passing_score: f64,
    /// Horizon used when a request does not say how far away the exam is.
    #[serde(default = "default_weeks_until_exam")]
    pub default_weeks_until_exam: u32,
}

fn default_high_risk() -> f64 {
    0.7
}
fn default_medium_risk() -> f64 {
    0.4
}
fn default_passing_score() -> f64 {
    75.0
}
fn default_weeks_until_exam() -> u32 {
    8
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: default_high_risk(),
            medium_risk_threshold: default_medium_risk(),
            passing_score: default_passing_score(),
            default_weeks_until_exam: default_weeks_until_exam(),
        }
    }
}

/// Ledger query defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Mastery below which a concept counts as weak.
    #[serde(default = "default_weak_threshold")]
    pub weak_threshold: f64,
}

fn default_weak_threshold() -> f64 {
    0.7
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            weak_threshold: default_weak_threshold(),
        }
    }
}

/// Top-level knowtrack configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub bkt: BktParams,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl TrackerConfig {
    /// Check that every parameter is usable by the components.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("bkt.prior_knowledge", self.bkt.prior_knowledge),
            ("bkt.learn", self.bkt.learn),
            ("bkt.guess", self.bkt.guess),
            ("bkt.slip", self.bkt.slip),
            ("risk.high_risk_threshold", self.risk.high_risk_threshold),
            ("risk.medium_risk_threshold", self.risk.medium_risk_threshold),
            ("ledger.weak_threshold", self.ledger.weak_threshold),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        if self.risk.medium_risk_threshold > self.risk.high_risk_threshold {
            return Err(ConfigError::RiskThresholdsInverted {
                medium: self.risk.medium_risk_threshold,
                high: self.risk.high_risk_threshold,
            });
        }

        let sched = &self.scheduler;
        if sched.min_interval_days == 0 || sched.min_interval_days > sched.max_interval_days {
            return Err(ConfigError::InvalidIntervalBounds {
                min: sched.min_interval_days,
                max: sched.max_interval_days,
            });
        }
        if sched.min_ease_factor.is_nan() || sched.min_ease_factor <= 0.0 {
            return Err(ConfigError::InvalidMinEaseFactor(sched.min_ease_factor));
        }

        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `knowtrack.toml` in the current directory
/// 2. `~/.config/knowtrack/config.toml`
///
/// Environment variable overrides: `KNOWTRACK_PASSING_SCORE`, `KNOWTRACK_WEAK_THRESHOLD`.
pub fn load_config() -> Result<TrackerConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TrackerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("knowtrack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TrackerConfig::default(),
    };

    if let Some(score) = env_f64("KNOWTRACK_PASSING_SCORE")? {
        config.risk.passing_score = score;
    }
    if let Some(threshold) = env_f64("KNOWTRACK_WEAK_THRESHOLD")? {
        config.ledger.weak_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a TOML string into a config without validating it.
pub fn parse_config_str(content: &str) -> Result<TrackerConfig> {
    Ok(toml::from_str::<TrackerConfig>(content)?)
}

fn env_f64(name: &str) -> Result<Option<f64>> {
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{name} must be a number, got '{raw}'"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("knowtrack"))
}
