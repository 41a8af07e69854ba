//! The `knowtrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

use knowtrack_core::config::load_config_from;
use knowtrack_core::model::ConceptMasteryRecord;
use knowtrack_core::timestamp::Timestamp;

use super::read_record_inputs;

pub fn execute(records_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let inputs = read_record_inputs(&records_path)?;

    println!("Records: {} ({} entries)", records_path.display(), inputs.len());

    let mut seen = std::collections::HashSet::new();
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for (i, input) in inputs.into_iter().enumerate() {
        match ConceptMasteryRecord::try_from_input(input, &config) {
            Ok(record) => {
                if !seen.insert(record.concept_id.clone()) {
                    println!("  [{}] WARNING: duplicate concept id", record.concept_id);
                    warnings += 1;
                }
                for (field, ts) in [
                    ("lastReviewed", &record.last_reviewed),
                    ("nextReviewDate", &record.next_review_date),
                ] {
                    if let Some(Timestamp::Malformed(raw)) = ts {
                        println!(
                            "  [{}] WARNING: {field} '{raw}' is not a valid timestamp",
                            record.concept_id
                        );
                        warnings += 1;
                    }
                }
            }
            Err(e) => {
                let prefix = e
                    .concept_id()
                    .map(|id| format!("  [{id}]"))
                    .unwrap_or_else(|| format!("  [#{i}]"));
                println!("{prefix} ERROR: {e}");
                errors += 1;
            }
        }
    }

    if errors == 0 && warnings == 0 {
        println!("All records valid.");
    } else {
        println!("\n{errors} error(s), {warnings} warning(s) found.");
    }

    anyhow::ensure!(errors == 0, "{errors} invalid record(s)");
    Ok(())
}
