//! inactivity-guard - lifecycle-driven lock screen and privacy overlay.
//!
//! Reads lifecycle events as text lines and drives the inactivity monitor
//! against an in-process navigation stack and a durable timestamp store.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use inactivity_guard::InactivityMonitor;
use inactivity_guard::clock::SystemClock;
use inactivity_guard::config::Config;
use inactivity_guard::daemon;
use inactivity_guard::navigation::StackNavigator;
use inactivity_guard::source::LifecycleSource;
use inactivity_guard::source::LineSource;
use inactivity_guard::store::FileStore;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Lifecycle-driven lock screen and privacy overlay monitor.
///
/// Reads one lifecycle state per line (`active`, `inactive`, `background`,
/// or `previous -> next`) from stdin or a replay file.
#[derive(Parser, Debug)]
#[command(name = "inactivity-guard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the lock threshold in milliseconds.
    #[arg(long)]
    lock_threshold_ms: Option<u64>,

    /// Override the timestamp store path.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Read events from a file instead of stdin.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the navigation state after each event to stdout.
    #[arg(long)]
    print_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("inactivity-guard v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config =
        Config::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(ms) = args.lock_threshold_ms {
        config.lock_threshold_ms = ms;
    }
    if let Some(path) = args.store {
        config.store_path = Some(path);
    }

    let store_path = config.resolve_store_path()?;
    info!(
        "Configuration loaded (lock_threshold={:?}, store={})",
        config.lock_threshold(),
        store_path.display()
    );

    let mut monitor = InactivityMonitor::new(
        StackNavigator::new(),
        FileStore::open(&store_path),
        SystemClock,
        config.lock_threshold(),
    );

    if let Some(path) = args.replay {
        let file = tokio::fs::File::open(&path)
            .await
            .with_context(|| format!("Failed to open replay file: {}", path.display()))?;
        run_with(LineSource::new(BufReader::new(file)), &mut monitor, args.print_events).await
    } else {
        let stdin = tokio::io::stdin();
        run_with(LineSource::new(BufReader::new(stdin)), &mut monitor, args.print_events).await
    }
}

/// Initialize logging with the specified level.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(format!("inactivity_guard={level}"))
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Run the daemon loop, printing navigation state to stdout if requested.
async fn run_with<L: LifecycleSource>(
    source: L,
    monitor: &mut InactivityMonitor<StackNavigator, FileStore, SystemClock>,
    print_events: bool,
) -> Result<()> {
    let mut stdout = std::io::stdout();
    let events_out: Option<&mut dyn Write> = if print_events {
        Some(&mut stdout)
    } else {
        None
    };
    daemon::run(source, monitor, events_out).await
}
