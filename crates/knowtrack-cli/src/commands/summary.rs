//! The `knowtrack summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use knowtrack_core::config::load_config_from;
use knowtrack_core::{MasteryLabel, MasteryLedger};

use super::load_records;

pub fn execute(records_path: PathBuf, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let records = load_records(&records_path, &config)?;
    let summary = MasteryLedger::new(config.ledger).summarize(&records);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Level", "Concepts", "Share"]);
    for label in MasteryLabel::ALL {
        let count = summary.counts.get(label);
        let share = if summary.total == 0 {
            0.0
        } else {
            count as f64 / summary.total as f64
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(count),
            Cell::new(format!("{:.1}%", share * 100.0)),
        ]);
    }

    println!("{table}");
    println!(
        "{} concept(s), average mastery {:.1}%",
        summary.total,
        summary.average_mastery * 100.0
    );

    Ok(())
}
