//! Subcommand implementations and the helpers they share.

pub mod attempt;
pub mod due;
pub mod init;
pub mod risk;
pub mod summary;
pub mod validate;
pub mod weak;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use knowtrack_core::model::{ConceptMasteryRecord, RecordInput};
use knowtrack_core::timestamp::parse_iso8601;
use knowtrack_core::TrackerConfig;

/// Read the raw record array from a JSON file.
pub fn read_record_inputs(path: &Path) -> Result<Vec<RecordInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse records JSON: {}", path.display()))
}

/// Read and validate every record in a JSON file.
pub fn load_records(path: &Path, config: &TrackerConfig) -> Result<Vec<ConceptMasteryRecord>> {
    read_record_inputs(path)?
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            ConceptMasteryRecord::try_from_input(input, config)
                .with_context(|| format!("invalid record #{i} in {}", path.display()))
        })
        .collect()
}

/// Write records back as pretty JSON.
pub fn save_records(path: &Path, records: &[ConceptMasteryRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("failed to serialize records")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write records to {}", path.display()))
}

/// Resolve a `--now` argument. Unlike stored dates, a bad value here is an error.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(raw) => {
            parse_iso8601(raw).with_context(|| format!("invalid --now timestamp: '{raw}'"))
        }
        None => Ok(Utc::now()),
    }
}
