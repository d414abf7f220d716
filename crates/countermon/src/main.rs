//! countermon - Performance Counter Check & Metrics Plugin
//!
//! Entry point for the one-shot check. Metric lines and check diagnostics
//! go to stdout; logs go to stderr so the metric stream stays clean.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use countermon::config::DEFAULT_CONFIG_FILE;
use countermon::reporter::{run_once, RunOptions};
use countermon::sampler;
use countermon_common::process::TYPEPERF_CMD;

/// Exit code for operational faults (config unreadable, sampler failed) -
/// neither OK nor CRITICAL.
const EXIT_UNKNOWN: u8 = 3;

/// Performance counter metrics and threshold check plugin
#[derive(Parser, Debug)]
#[command(name = "countermon")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Global scheme, text to prepend to .<relative_scheme>; defaults to
    /// the local hostname
    #[arg(long)]
    scheme: Option<String>,

    /// Path to the counter configuration file
    #[arg(short = 'f', long, default_value = DEFAULT_CONFIG_FILE)]
    file: PathBuf,

    /// Sampler executable invoked to read the counters
    #[arg(long, default_value = TYPEPERF_CMD)]
    sampler: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing/logging subsystem
fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let prefix = match args.scheme {
        Some(scheme) => scheme,
        None => match sampler::resolve_hostname().await {
            Ok(name) => name,
            Err(e) => {
                error!("Failed to resolve hostname for scheme prefix: {e}");
                return ExitCode::from(EXIT_UNKNOWN);
            }
        },
    };

    let opts = RunOptions {
        config_path: args.file,
        prefix,
        sampler_cmd: args.sampler,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run_once(&opts, &mut out).await {
        Ok(summary) => {
            info!(
                emitted = summary.emitted,
                violations = summary.violations,
                status = summary.status.as_str(),
                "Check complete"
            );
            ExitCode::from(summary.status.exit_code())
        }
        Err(e) => {
            error!("countermon failed: {e}");
            ExitCode::from(EXIT_UNKNOWN)
        }
    }
}
