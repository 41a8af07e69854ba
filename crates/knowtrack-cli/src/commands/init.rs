//! The `knowtrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("knowtrack.toml");
    if path.exists() {
        println!("knowtrack.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created knowtrack.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust the BKT parameters and thresholds in knowtrack.toml");
    println!("  2. Run: knowtrack attempt --records records.json --concept fractions --correct --write");
    println!("  3. Run: knowtrack due --records records.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# knowtrack configuration

[bkt]
prior_knowledge = 0.3   # pL0, seeds new concepts
learn = 0.3             # pT
guess = 0.2             # pG
slip = 0.1              # pS

[scheduler]
min_interval_days = 1
max_interval_days = 365
second_interval_days = 6
initial_ease_factor = 2.5
min_ease_factor = 1.3

[risk]
high_risk_threshold = 0.7
medium_risk_threshold = 0.4
passing_score = 75.0
default_weeks_until_exam = 8

[ledger]
weak_threshold = 0.7
"#;
