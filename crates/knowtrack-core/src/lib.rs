//! knowtrack-core — concept mastery tracing, review scheduling, and exam risk.
//!
//! Four stateless components, each built from its own config section:
//! [`MasteryEstimator`] (BKT update), [`MasteryLedger`] (labels and
//! summaries), [`ReviewScheduler`] (SM-2 intervals), and [`RiskAssessor`].
//! [`ConceptTracker`] chains the estimator and scheduler for one attempt.
//!
//! Nothing here stores records. Callers load a record, apply an attempt,
//! and persist the result themselves, serializing updates per concept.

pub mod config;
pub mod error;
pub mod estimator;
pub mod ledger;
pub mod model;
pub mod risk;
pub mod scheduler;
pub mod timestamp;
pub mod tracker;

pub use config::TrackerConfig;
pub use estimator::MasteryEstimator;
pub use ledger::MasteryLedger;
pub use model::{ConceptMasteryRecord, MasteryLabel};
pub use risk::RiskAssessor;
pub use scheduler::ReviewScheduler;
pub use tracker::ConceptTracker;
