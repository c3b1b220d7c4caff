//! `run` command implementation.

use std::time::Duration;

use anyhow::Result;
use contracts::Message;
use dispatcher::{Dispatcher, HttpTransport, MetricsSnapshot, Producer};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{info, warn};

use super::load_config;
use crate::cli::RunArgs;
use crate::error::CliError;

/// Poll interval while waiting for the queue to drain after EOF
const DRAIN_POLL: Duration = Duration::from_millis(100);

/// Execute the `run` command
pub async fn run_dispatch(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let mut config = load_config(&args.config)?;

    // Apply CLI overrides
    if let Some(ref token) = args.token {
        info!("Overriding push token from CLI");
        config.token = token.clone();
    }
    if let Some(interval) = args.min_interval {
        info!(min_interval = interval, "Overriding min interval from CLI");
        config.min_interval_seconds = interval;
    }
    config_loader::ConfigLoader::validate(&config)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    info!(
        provider = config.provider.name(),
        enabled = config.enabled,
        allowed_categories = config.allowed_categories.len(),
        min_interval = config.min_interval_seconds,
        "Configuration loaded"
    );

    let transport = HttpTransport::from_config(&config).map_err(CliError::from)?;
    let mut dispatcher = Dispatcher::new(config);
    if !dispatcher.start(transport)? {
        warn!("Dispatcher is disabled or has no token, messages will be dropped");
    }

    let producer = dispatcher.producer();
    let shutdown_signal = setup_shutdown_signal();
    tokio::pin!(shutdown_signal);

    let interrupted = tokio::select! {
        result = read_messages(tokio::io::stdin(), &producer) => {
            let lines = result?;
            info!(lines, "Input finished, waiting for pending messages");
            tokio::select! {
                _ = wait_until_drained(&dispatcher) => false,
                _ = &mut shutdown_signal => true,
            }
        }
        _ = &mut shutdown_signal => true,
    };

    if interrupted {
        warn!("Received shutdown signal, stopping dispatcher...");
    }

    dispatcher.stop().await;
    let snapshot = dispatcher.snapshot();
    dispatcher.shutdown().await;

    print_summary(&snapshot);
    info!("Notify Dispatch finished");
    Ok(())
}

/// Enqueue one message per non-empty input line
///
/// Malformed lines and rejected messages are logged and skipped.
/// Returns the number of lines read.
async fn read_messages<R>(input: R, producer: &Producer) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await.map_err(CliError::from)? {
        count += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Message>(line) {
            // Rejections are already logged by the producer
            Ok(message) => {
                let _ = producer.enqueue(message);
            }
            Err(e) => {
                let error = CliError::invalid_message(count, e.to_string());
                warn!(error = %error, "Skipping malformed input line");
            }
        }
    }

    Ok(count)
}

/// Resolve once every accepted message was sent, failed or skipped
async fn wait_until_drained(dispatcher: &Dispatcher) {
    if !dispatcher.is_running() {
        return;
    }

    loop {
        let snapshot = dispatcher.snapshot();
        if snapshot.processed_count() >= snapshot.enqueued_count {
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_summary(snapshot: &MetricsSnapshot) {
    println!("\n=== Dispatch Summary ===\n");
    println!("Messages:");
    println!("  Enqueued: {}", snapshot.enqueued_count);
    println!("  Rejected: {}", snapshot.rejected_count);
    println!("  Sent: {}", snapshot.sent_count);
    println!("  Failed: {}", snapshot.failure_count);
    println!("  Skipped: {}", snapshot.skipped_count);
    println!("  Left in queue: {}", snapshot.queue_len);
    match snapshot.last_success_at {
        Some(at) => println!("  Last success: {}", at.to_rfc3339()),
        None => println!("  Last success: never"),
    }

    println!("\nTiming (ms):");
    println!("  Rate limit wait: {}", snapshot.wait_ms);
    println!("  Send latency: {}", snapshot.latency_ms);
    println!();
}
