//! The `knowtrack risk` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use knowtrack_core::config::load_config_from;
use knowtrack_core::risk::RiskInput;
use knowtrack_core::RiskAssessor;

pub fn execute(input_path: PathBuf, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let content = std::fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read risk input from {}", input_path.display()))?;
    let input: RiskInput = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse risk input: {}", input_path.display()))?;

    let assessment = RiskAssessor::new(config.risk).assess(&input);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!(
        "Risk: {} ({:.0}%)",
        assessment.risk_level.to_string().to_uppercase(),
        assessment.risk_score * 100.0
    );
    println!(
        "Current average: {:.1}%  Predicted: {:.1}% in {} week(s)  Trend: {:+.2}/test",
        assessment.current_average_score,
        assessment.predicted_score,
        assessment.weeks_until_exam,
        assessment.trend_slope
    );

    if !assessment.risk_factors.is_empty() {
        println!("\nRisk factors:");
        for factor in &assessment.risk_factors {
            println!("  - {factor}");
        }
    }

    println!("\nRecommendations:");
    for rec in &assessment.recommendations {
        println!("  - {rec}");
    }

    Ok(())
}
