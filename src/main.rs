use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

use soakwatch::report::{console_summary, rule};
use soakwatch::{
    discover_logs, MonitorConfig, MonitorExit, RecordSource, RunReport, SoakMonitor,
    WatermarkPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "soakwatch")]
#[command(about = "Incremental soak-test trend monitor for flight-software downlink logs")]
struct Args {
    /// Decoded log files, or directories of them
    #[arg(short, long = "logs", required = true, num_args = 1..)]
    logs: Vec<PathBuf>,

    /// Flight dictionary the logs were decoded with (shown in the banner)
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// State file carrying watermarks and history between runs
    #[arg(short, long)]
    state_file: Option<PathBuf>,

    /// Write a JSON report of this run
    #[arg(long)]
    report_file: Option<PathBuf>,

    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How watermarks advance after the run
    #[arg(long, value_enum)]
    watermark_policy: Option<WatermarkPolicy>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(MonitorExit::Error.code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Flags override file and environment settings.
fn resolve_config(args: &Args) -> Result<MonitorConfig> {
    let mut config =
        MonitorConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(path) = &args.state_file {
        config.state_file = path.clone();
    }
    if let Some(path) = &args.report_file {
        config.report_file = Some(path.clone());
    }
    if let Some(policy) = args.watermark_policy {
        config.watermark_policy = policy;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<MonitorExit> {
    let config = resolve_config(&args)?;

    // Resolve every input before state is loaded or touched.
    let mut sources: Vec<Box<dyn RecordSource>> =
        discover_logs(&args.logs, &config.log_extension)?
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn RecordSource>)
            .collect();

    let mut monitor = SoakMonitor::open(config).context("Failed to load monitor state")?;

    println!("{}", rule('='));
    println!("SOAK TEST MONITOR");
    println!("{}", rule('='));
    if let Some(dictionary) = &args.dictionary {
        println!("Dictionary: {}", dictionary.display());
    }
    for path in &args.logs {
        println!("Logs: {}", path.display());
    }
    println!("State file: {}", monitor.store().path().display());
    println!(
        "Last run: {}",
        monitor.state().last_run_timestamp.as_deref().unwrap_or("Never")
    );
    println!("{}", rule('-'));

    println!("Processing {} log files...", sources.len());
    for source in &sources {
        println!("Processing: {}", source.description());
    }
    let data = monitor
        .run(&mut sources, Utc::now())
        .context("Failed to read log input")?;

    println!();
    print!("{}", console_summary(&data));

    // Write failures are reported but do not change the run's outcome.
    if let Err(e) = monitor.save() {
        error!(error = %e, "State not saved; previous state remains authoritative");
        println!("\nState NOT saved: {}", e);
    }

    if let Some(path) = &monitor.config().report_file {
        match RunReport::new(&data).write(path) {
            Ok(()) => println!("\nReport saved to: {}", path.display()),
            Err(e) => {
                error!(error = %e, "Report not written");
                println!("\nReport NOT saved: {}", e);
            }
        }
    }

    println!("{}", rule('='));

    let exit = MonitorExit::for_run(&data.summary);
    if exit == MonitorExit::Clean {
        println!("✅ MONITORING COMPLETED SUCCESSFULLY");
    } else {
        println!("⚠️  EXITING WITH ERROR DUE TO ALERTS/FATALS");
    }
    Ok(exit)
}
