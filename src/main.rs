use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use pr_stats::config::Config;
use pr_stats::records::{self, PrRecord, RecordStore};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Merge the latest PR snapshot into the record store
    Update {
        /// Snapshot file to ingest (defaults to `snapshot` from the config)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },
    /// Render the Markdown report (default if no subcommand)
    Report {
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Evaluate as of this RFC 3339 time instead of the current time
        #[arg(long, value_parser = parse_reference_time)]
        now: Option<DateTime<Utc>>,
    },
    /// Print statistics for a single trailing window
    Summary {
        /// Window length in weeks
        #[arg(short, long, default_value_t = 4)]
        weeks: u32,

        /// Print JSON instead of a Markdown table
        #[arg(long)]
        json: bool,

        /// Evaluate as of this RFC 3339 time instead of the current time
        #[arg(long, value_parser = parse_reference_time)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pr-stats")]
#[command(about = "Pull request statistics for internal and external contributors", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pr-stats/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_reference_time(value: &str) -> Result<DateTime<Utc>, String> {
    records::types::parse_timestamp(value).map_err(|e| format!("invalid RFC 3339 time '{}': {}", value, e))
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Report {
        output: None,
        now: None,
    });

    if let Commands::Init { force } = command {
        let code = match pr_stats::config::write_default_config(cli.config, force) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                EXIT_SUCCESS
            }
            Err(e) => {
                error!("{:#}", e);
                EXIT_CONFIG
            }
        };
        std::process::exit(code);
    }

    let config = match pr_stats::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = pr_stats::config::validate_config(&config) {
        error!("Config errors:");
        for e in errors {
            error!("  - {}", e);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if config.internal_members.is_empty() {
        warn!("No internal_members configured; every PR counts as external");
    }
    debug!(
        "Branch '{}', {} internal members",
        config.main_branch,
        config.internal_members.len()
    );

    let result = match command {
        Commands::Update { snapshot } => run_update(&config, snapshot),
        Commands::Report { output, now } => run_report(&config, output, now.unwrap_or_else(Utc::now)),
        Commands::Summary { weeks, json, now } => {
            run_summary(&config, weeks, json, now.unwrap_or_else(Utc::now))
        }
        Commands::Init { .. } => Ok(()),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn run_update(config: &Config, snapshot: Option<PathBuf>) -> Result<()> {
    let snapshot_path = snapshot.unwrap_or_else(|| config.snapshot.clone());
    let store = RecordStore::new(&config.record_store);

    store.ensure_initialized()?;
    let existing = store.load_all()?;
    let incoming = records::read_snapshot(&snapshot_path)?;
    info!(
        "Ingesting {} PRs from {}",
        incoming.len(),
        snapshot_path.display()
    );

    let outcome = store.merge_and_persist(existing, incoming)?;

    let line = format!(
        "{} records in {} ({} added, {} updated, {} unchanged)",
        outcome.records.len(),
        store.path().display(),
        outcome.added,
        outcome.updated,
        outcome.unchanged
    );
    if std::io::stdout().is_terminal() {
        println!("{}", line.green());
    } else {
        println!("{}", line);
    }
    Ok(())
}

fn load_records(config: &Config) -> Result<Vec<PrRecord>> {
    let store = RecordStore::new(&config.record_store);
    let records = store.load_all()?;
    if records.is_empty() {
        warn!(
            "Record store {} is empty; run `pr-stats update` first",
            store.path().display()
        );
    }
    Ok(records.into_values().collect())
}

fn run_report(config: &Config, output: Option<PathBuf>, now: DateTime<Utc>) -> Result<()> {
    let records = load_records(config)?;
    let report = pr_stats::report::render_report(&records, &config.scope(), &config.report, now);

    match output {
        Some(path) => {
            write_atomically(&path, &report)?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", report),
    }
    Ok(())
}

fn run_summary(config: &Config, weeks: u32, json: bool, now: DateTime<Utc>) -> Result<()> {
    if weeks == 0 || weeks > pr_stats::stats::MAX_SUMMARY_WEEKS {
        anyhow::bail!(
            "--weeks must be between 1 and {}",
            pr_stats::stats::MAX_SUMMARY_WEEKS
        );
    }
    let records = load_records(config)?;
    let summary = pr_stats::stats::trailing_summary(&records, &config.scope(), now, weeks);

    if json {
        let text = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", text);
    } else {
        println!("## Last {} weeks\n", weeks);
        print!("{}", pr_stats::report::render_summary_table(&[(weeks, summary)]));
    }
    Ok(())
}

fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}
