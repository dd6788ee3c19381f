use anyhow::Result;
use clap::Parser;
use linger_daemon::{
    collector::LinuxProcessCollector,
    config::Policy,
    executor::SigkillExecutor,
    monitor::Monitor,
    reporter::{ConsoleSink, FileSink, Reporter},
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "lingerd",
    version,
    about = "Terminates processes that outlive their allowed lifetime"
)]
struct Cli {
    /// Name of the process to watch, compared case-insensitively
    #[arg(required_unless_present = "config")]
    process_name: Option<String>,

    /// Maximum allowed lifetime in minutes
    #[arg(required_unless_present = "config")]
    max_lifetime: Option<u64>,

    /// Minutes to wait between scans
    #[arg(required_unless_present = "config")]
    frequency: Option<u64>,

    /// Read the policy from a TOML file instead of positional arguments
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with_all = ["process_name", "max_lifetime", "frequency"]
    )]
    config: Option<PathBuf>,

    /// Append status lines to this file in addition to the console
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt::init();
    info!("LingerGuard daemon starting...");

    let policy = match cli.config.as_deref() {
        Some(path) => Policy::load(path)?,
        // clap guarantees the positionals whenever --config is absent
        None => Policy::from_minutes(
            cli.process_name.unwrap_or_default(),
            cli.max_lifetime.unwrap_or_default(),
            cli.frequency.unwrap_or_default(),
        ),
    };

    let mut reporter = Reporter::new();
    reporter.attach(Box::new(ConsoleSink));
    if let Some(path) = cli.log_file.as_deref() {
        match FileSink::open(path) {
            Ok(sink) => reporter.attach(Box::new(sink)),
            Err(e) => warn!(
                "could not open log file {}: {}, continuing with console only",
                path.display(),
                e
            ),
        }
    }

    let (stop_tx, stop_rx) = watch::channel(false);

    // The blocking stdin read gets its own thread so it never stalls the
    // runtime; typing `q` requests a stop.
    let stdin_stop = stop_tx.clone();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("q") {
                let _ = stdin_stop.send(true);
                break;
            }
        }
    });

    // Ctrl-C feeds the same stop channel.
    let signal_stop = stop_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_stop.send(true);
        }
    });

    info!("press q then Enter (or Ctrl-C) to stop");

    let monitor = Monitor::new(
        policy,
        LinuxProcessCollector::new(),
        SigkillExecutor,
        reporter,
    )?;
    monitor.run(stop_rx).await?;

    info!("LingerGuard daemon stopped");
    Ok(())
}
