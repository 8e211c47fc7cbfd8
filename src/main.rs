//! taskheap - priority task scheduler
//!
//! CLI entry point for replaying scheduling scripts.

use std::fs;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use taskheap::cli::{Cli, Command, OutputFormat, get_log_path};
use taskheap::config::Config;
use taskheap::scheduler::SchedulerHandle;
use taskheap::script::{Script, ScriptReport, replay};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    info!(
        "taskheap loaded config: duplicate_policy={}",
        config.scheduler.duplicate_policy
    );

    match cli.command {
        Command::Run { script, format } => cmd_run(&config, &script, format).await,
        Command::Config => cmd_config(&config),
    }
}

/// Replay a script and print what the scheduler dispatched
async fn cmd_run(config: &Config, path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let script = Script::load(path)?;

    let handle = SchedulerHandle::spawn(config.scheduler.clone());
    let report = replay(&handle, &script).await.context("Scheduler stopped during replay")?;
    handle.shutdown().await.context("Failed to stop scheduler")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &ScriptReport) {
    println!("{}", "Dispatched:".bold());
    if report.dispatched.is_empty() {
        println!("  (none)");
    }
    for (position, task) in report.dispatched.iter().enumerate() {
        println!("  {:>3}. task {} (priority {})", position + 1, task.id.to_string().cyan(), task.priority);
    }

    if !report.remaining.is_empty() {
        println!("{}", "Still queued:".bold());
        for task in &report.remaining {
            println!("       task {} (priority {})", task.id.to_string().cyan(), task.priority);
        }
    }

    if !report.failures.is_empty() {
        println!("{}", "Rejected:".bold().red());
        for failure in &report.failures {
            println!("  op #{} ({}): {}", failure.index, failure.op, failure.error.red());
        }
    }

    let stats = &report.stats;
    println!(
        "{} added={} dispatched={} priority_changes={} rejected={} peak_depth={}",
        "Stats:".bold(),
        stats.total_added,
        stats.total_dispatched,
        stats.total_priority_changes,
        stats.total_rejected,
        stats.peak_depth
    );
}

/// Print the effective configuration as YAML
fn cmd_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    print!("{}", yaml);
    Ok(())
}
