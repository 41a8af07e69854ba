//! The `knowtrack attempt` command.

use std::path::PathBuf;

use anyhow::Result;

use knowtrack_core::config::load_config_from;
use knowtrack_core::ConceptTracker;

use super::{load_records, resolve_now, save_records};

pub fn execute(
    records_path: PathBuf,
    concept_id: String,
    is_correct: bool,
    now: Option<String>,
    write: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let concept_id = concept_id.trim().to_string();
    anyhow::ensure!(!concept_id.is_empty(), "concept id must not be empty");

    let config = load_config_from(config_path.as_deref())?;
    let now = resolve_now(now.as_deref())?;
    let tracker = ConceptTracker::new(config);

    let mut records = if records_path.exists() {
        load_records(&records_path, tracker.config())?
    } else if write {
        tracing::info!("{} does not exist, starting empty", records_path.display());
        Vec::new()
    } else {
        anyhow::bail!("records file not found: {}", records_path.display());
    };

    let position = records.iter().position(|r| r.concept_id == concept_id);
    let current = match position {
        Some(i) => records[i].clone(),
        None => {
            tracing::info!("new concept '{concept_id}', seeding from prior");
            tracker.new_record(concept_id.as_str())
        }
    };

    let update = tracker.record_attempt(&current, is_correct, now);

    println!("{}", serde_json::to_string_pretty(&update)?);

    if write {
        match position {
            Some(i) => records[i] = update.record,
            None => records.push(update.record),
        }
        save_records(&records_path, &records)?;
        eprintln!("Saved {} record(s) to {}", records.len(), records_path.display());
    }

    Ok(())
}
