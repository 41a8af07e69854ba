//! The `knowtrack due` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use knowtrack_core::config::load_config_from;
use knowtrack_core::model::ConceptMasteryRecord;
use knowtrack_core::ReviewScheduler;

use super::{load_records, resolve_now};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DueEntry<'a> {
    #[serde(flatten)]
    record: &'a ConceptMasteryRecord,
    days_overdue: i64,
}

pub fn execute(
    records_path: PathBuf,
    now: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let now = resolve_now(now.as_deref())?;
    let records = load_records(&records_path, &config)?;
    let due = ReviewScheduler::new(config.scheduler).due_concepts(&records, now);

    if format == "json" {
        let entries: Vec<DueEntry<'_>> = due
            .iter()
            .map(|d| DueEntry {
                record: d.record,
                days_overdue: d.days_overdue,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if due.is_empty() {
        println!("Nothing due for review.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Due", "Days Overdue", "Mastery", "Interval"]);
    for d in &due {
        let due_at = d
            .record
            .next_review_date
            .as_ref()
            .map(|ts| ts.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&d.record.concept_id),
            Cell::new(due_at),
            Cell::new(d.days_overdue),
            Cell::new(format!("{:.1}%", d.record.mastery_probability * 100.0)),
            Cell::new(format!("{}d", d.record.interval)),
        ]);
    }

    println!("{table}");
    println!("{} concept(s) due", due.len());

    Ok(())
}
