//! Mastery classification and cohort summaries.

use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::model::{ConceptMasteryRecord, MasteryLabel};

/// Map a mastery probability to its band. Lower bounds are inclusive.
pub fn classify(mastery: f64) -> MasteryLabel {
    if mastery >= 0.9 {
        MasteryLabel::Mastered
    } else if mastery >= 0.7 {
        MasteryLabel::Proficient
    } else if mastery >= 0.5 {
        MasteryLabel::Developing
    } else if mastery >= 0.3 {
        MasteryLabel::Beginning
    } else {
        MasteryLabel::Novice
    }
}

/// Number of records in each mastery band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub mastered: usize,
    pub proficient: usize,
    pub developing: usize,
    pub beginning: usize,
    pub novice: usize,
}

impl LabelCounts {
    pub fn get(&self, label: MasteryLabel) -> usize {
        match label {
            MasteryLabel::Mastered => self.mastered,
            MasteryLabel::Proficient => self.proficient,
            MasteryLabel::Developing => self.developing,
            MasteryLabel::Beginning => self.beginning,
            MasteryLabel::Novice => self.novice,
        }
    }

    fn bump(&mut self, label: MasteryLabel) {
        let slot = match label {
            MasteryLabel::Mastered => &mut self.mastered,
            MasteryLabel::Proficient => &mut self.proficient,
            MasteryLabel::Developing => &mut self.developing,
            MasteryLabel::Beginning => &mut self.beginning,
            MasteryLabel::Novice => &mut self.novice,
        };
        *slot += 1;
    }
}

/// Summary statistics over a set of mastery records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterySummary {
    pub total: usize,
    #[serde(flatten)]
    pub counts: LabelCounts,
    pub average_mastery: f64,
}

/// Read-only queries over batches of mastery records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasteryLedger {
    config: LedgerConfig,
}

impl MasteryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, mastery: f64) -> MasteryLabel {
        classify(mastery)
    }

    /// Records below the configured weak threshold, weakest first.
    pub fn weak_concepts<'a>(
        &self,
        records: &'a [ConceptMasteryRecord],
    ) -> Vec<&'a ConceptMasteryRecord> {
        self.weak_concepts_below(records, self.config.weak_threshold)
    }

    /// Records with mastery strictly below `threshold`, weakest first.
    /// Equal masteries keep their input order.
    pub fn weak_concepts_below<'a>(
        &self,
        records: &'a [ConceptMasteryRecord],
        threshold: f64,
    ) -> Vec<&'a ConceptMasteryRecord> {
        let mut weak: Vec<_> = records
            .iter()
            .filter(|r| r.mastery_probability < threshold)
            .collect();
        weak.sort_by(|a, b| a.mastery_probability.total_cmp(&b.mastery_probability));
        weak
    }

    /// Counts per band and mean mastery. Empty input gives all zeros.
    pub fn summarize(&self, records: &[ConceptMasteryRecord]) -> MasterySummary {
        if records.is_empty() {
            return MasterySummary::default();
        }

        let mut counts = LabelCounts::default();
        let mut total_mastery = 0.0;
        for record in records {
            counts.bump(classify(record.mastery_probability));
            total_mastery += record.mastery_probability;
        }

        MasterySummary {
            total: records.len(),
            counts,
            average_mastery: total_mastery / records.len() as f64,
        }
    }
}
