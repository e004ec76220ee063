mod config;
mod error;
mod model;
mod monitor;
mod render;

use clap::Parser;
use config::{Config, OutputFormat};
use monitor::MemoryMonitor;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Reports macOS virtual memory statistics.
#[derive(Parser)]
#[command(name = "mac-meminfo", version)]
struct Args {
    /// Config file (JSON). Defaults to ~/Library/Application Support/mac-meminfo/config.json.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between collections.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Collect once and exit.
    #[arg(long)]
    once: bool,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Metric name prefix for text output.
    #[arg(long)]
    namespace: Option<String>,

    /// -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_snapshot(monitor: &MemoryMonitor, config: &Config) -> Result<(), error::CollectError> {
    let snapshot = monitor.poll()?.snapshot();
    match config.format {
        OutputFormat::Text => print!("{}", render::text(&snapshot, &config.namespace)),
        OutputFormat::Json => match render::json(&snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("failed to encode snapshot: {}", e),
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let path = args.config.unwrap_or_else(config::default_path);
    let mut config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(secs) = args.interval {
        config.poll_interval_secs = secs;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(namespace) = args.namespace {
        config.namespace = namespace;
    }

    let monitor = MemoryMonitor::new();

    if args.once {
        return match print_snapshot(&monitor, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let poll_interval = Duration::from_secs(config.poll_interval_secs.max(1));
    info!(
        "mac-meminfo {} collecting every {}s",
        env!("CARGO_PKG_VERSION"),
        poll_interval.as_secs()
    );
    loop {
        let started = Instant::now();
        if let Err(e) = print_snapshot(&monitor, &config) {
            error!("{}", e);
        }
        thread::sleep(poll_interval.saturating_sub(started.elapsed()));
    }
}
