//! The `knowtrack weak` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use knowtrack_core::config::load_config_from;
use knowtrack_core::ledger::classify;
use knowtrack_core::MasteryLedger;

use super::load_records;

pub fn execute(
    records_path: PathBuf,
    threshold: Option<f64>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let threshold = threshold.unwrap_or(config.ledger.weak_threshold);
    anyhow::ensure!(
        (0.0..=1.0).contains(&threshold),
        "threshold must be between 0.0 and 1.0"
    );

    let records = load_records(&records_path, &config)?;
    let weak = MasteryLedger::new(config.ledger).weak_concepts_below(&records, threshold);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&weak)?);
        return Ok(());
    }

    if weak.is_empty() {
        println!("No concepts below {:.0}% mastery.", threshold * 100.0);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Mastery", "Level", "Accuracy", "Attempts"]);
    for record in &weak {
        table.add_row(vec![
            Cell::new(&record.concept_id),
            Cell::new(format!("{:.1}%", record.mastery_probability * 100.0)),
            Cell::new(classify(record.mastery_probability)),
            Cell::new(format!("{:.1}%", record.accuracy() * 100.0)),
            Cell::new(record.attempts),
        ]);
    }

    println!("{table}");
    println!("{} weak concept(s)", weak.len());

    Ok(())
}
