//! knowtrack CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "knowtrack",
    version,
    about = "Concept mastery tracking, review scheduling, and exam risk"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one question attempt to a concept
    Attempt {
        /// JSON file holding an array of mastery records
        #[arg(long)]
        records: PathBuf,

        /// Concept the attempt belongs to
        #[arg(long)]
        concept: String,

        /// The answer was correct
        #[arg(long, conflicts_with = "incorrect", required_unless_present = "incorrect")]
        correct: bool,

        /// The answer was wrong
        #[arg(long)]
        incorrect: bool,

        /// Time of the attempt (ISO-8601, default: now)
        #[arg(long)]
        now: Option<String>,

        /// Save the updated records back to the file
        #[arg(long)]
        write: bool,
    },

    /// Summarize mastery across records
    Summary {
        #[arg(long)]
        records: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List concepts below a mastery threshold, weakest first
    Weak {
        #[arg(long)]
        records: PathBuf,

        /// Mastery threshold (default from config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List concepts due for review, most overdue first
    Due {
        #[arg(long)]
        records: PathBuf,

        /// Reference time (ISO-8601, default: now)
        #[arg(long)]
        now: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Assess exam risk from a score snapshot
    Risk {
        /// JSON file with currentScores, scoreTrend, consistency, improvementRate
        #[arg(long)]
        input: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a records file
    Validate {
        #[arg(long)]
        records: PathBuf,
    },

    /// Create a starter config
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("knowtrack=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Attempt {
            records,
            concept,
            correct,
            incorrect: _,
            now,
            write,
        } => commands::attempt::execute(records, concept, correct, now, write, config),
        Commands::Summary { records, format } => {
            commands::summary::execute(records, format, config)
        }
        Commands::Weak {
            records,
            threshold,
            format,
        } => commands::weak::execute(records, threshold, format, config),
        Commands::Due {
            records,
            now,
            format,
        } => commands::due::execute(records, now, format, config),
        Commands::Risk { input, format } => commands::risk::execute(input, format, config),
        Commands::Validate { records } => commands::validate::execute(records, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
