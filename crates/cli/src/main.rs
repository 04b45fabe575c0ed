//! Cache simulator CLI.
//!
//! This binary drives the cache engine from the command line. It provides:
//! 1. **Trace replay:** Build a hierarchy from a JSON config and replay an access trace.
//! 2. **Presets:** List the built-in cache presets as JSON.
//! 3. **Size:** Report the modeled hardware cost of each configured level.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rvsim_cache::config::{HierarchyConfig, builtin_presets};
use rvsim_cache::hierarchy::CacheHierarchy;
use rvsim_cache::sim::replay::{ReplaySummary, replay};
use rvsim_cache::sim::trace::load_trace;
use rvsim_cache::stats::{HierarchyStats, STATS_SECTIONS};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative cache simulator",
    long_about = "Replay memory-access traces through an L1/L2/L3 cache hierarchy.\n\nTrace lines are `R <addr>` or `W <addr>` with hex (0x) or decimal addresses; `#` starts a comment.\n\nExamples:\n  cachesim run --trace loop.trace\n  cachesim run --config hierarchy.json --trace loop.trace --sections levels\n  cachesim presets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print statistics.
    Run {
        /// Hierarchy configuration (JSON). Defaults to a single default L1.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Access trace to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// Print the statistics as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Report sections to print (comma separated). Empty prints all.
        #[arg(long, value_delimiter = ',', value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        sections: Vec<String>,
    },

    /// List the built-in cache presets.
    Presets,

    /// Print the modeled hardware cost of each configured level.
    Size {
        /// Hierarchy configuration (JSON). Defaults to a single default L1.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// JSON report of a replay.
#[derive(Serialize)]
struct RunReport {
    replay: ReplaySummary,
    stats: HierarchyStats,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            trace,
            json,
            sections,
        } => cmd_run(config.as_deref(), &trace, json, &sections),
        Commands::Presets => cmd_presets(),
        Commands::Size { config } => cmd_size(config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_hierarchy(path: Option<&Path>) -> Result<CacheHierarchy, Box<dyn Error>> {
    let config = match path {
        Some(path) => HierarchyConfig::from_json(&fs::read_to_string(path)?)?,
        None => HierarchyConfig::default(),
    };
    Ok(CacheHierarchy::from_config(&config)?)
}

/// Replays `trace` through the configured hierarchy and prints the report.
fn cmd_run(
    config: Option<&Path>,
    trace: &Path,
    json: bool,
    sections: &[String],
) -> Result<(), Box<dyn Error>> {
    let mut hierarchy = load_hierarchy(config)?;
    let records = load_trace(trace)?;
    info!(records = records.len(), "replaying trace");

    let summary = replay(&mut hierarchy, &records);
    let stats = hierarchy.stats();

    if json {
        let report = RunReport {
            replay: summary,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        stats.print_sections(sections);
    }
    Ok(())
}

fn cmd_presets() -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(&builtin_presets())?);
    Ok(())
}

fn cmd_size(config: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let hierarchy = load_hierarchy(config)?;
    for (level, cache) in hierarchy.enabled_levels() {
        println!("{level}");
        println!("{}", cache.cache_size());
    }
    Ok(())
}
