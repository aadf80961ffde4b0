//! Flipdeck CLI
//!
//! Run scripted gesture scenarios against the pager and check configuration
//! files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scenario;

use flipdeck_pager::PageConfig;
use scenario::{Report, Scenario};

#[derive(Parser)]
#[command(name = "flipdeck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flipdeck slide pager simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario against the in-memory host
    Simulate {
        /// Scenario file (TOML)
        script: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a pager configuration file (JSON or TOML)
    Check {
        /// Configuration file
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate { script, json } => cmd_simulate(&script, json),
        Commands::Check { config } => cmd_check(&config),
    }
}

fn cmd_simulate(script: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::load(script)?;
    info!(
        "Simulating {} ({} slide(s), {:?} host, {} step(s))",
        script.display(),
        scenario.slides,
        scenario.host,
        scenario.steps.len()
    );

    let report = scenario.run()?;
    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    for record in &report.events {
        let step = record
            .step
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        match record.slides {
            Some((from, to)) => println!("[{step:>3}] {} {from} -> {to}", record.event),
            None => println!("[{step:>3}] {}", record.event),
        }
    }
    println!();
    println!(
        "Final: slide {} of {} ({})",
        report.page_now, report.page_count, report.state
    );
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = PageConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    info!("{} is valid", path.display());
    println!("current:             {}", config.current);
    println!("cycle:               {}", config.cycle);
    println!("first change:        {}", config.first_change);
    println!("single:              {}", config.single);
    println!("scale / moveY:       {} / {}", config.scale, config.move_y);
    println!("threshold:           {}px", config.translate_threshold);
    println!(
        "transition:          {}ms {}",
        config.transition_time, config.easing_type
    );
    println!("resize debounce:     {}ms", config.resize_polling);
    Ok(())
}
