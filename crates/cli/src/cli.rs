//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Notify Dispatch - rate-limited push notification dispatcher
#[derive(Parser, Debug)]
#[command(
    name = "notify-dispatch",
    author,
    version,
    about = "Rate-limited push notification dispatcher",
    long_about = "Queues notification messages and forwards them one at a time to an \n\
                  HTTP push provider, keeping a minimum interval between two \n\
                  successful sends and dropping categories that are not enabled."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "NOTIFY_DISPATCH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "NOTIFY_DISPATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch newline-delimited JSON messages read from stdin
    Run(RunArgs),

    /// Send one message directly, bypassing queue and rate limit
    Send(SendArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "notify.toml",
        env = "NOTIFY_DISPATCH_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the push token from configuration
    #[arg(long, env = "NOTIFY_DISPATCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the minimum interval between successful sends (seconds)
    #[arg(long, env = "NOTIFY_DISPATCH_MIN_INTERVAL")]
    pub min_interval: Option<f64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "NOTIFY_DISPATCH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "notify.toml",
        env = "NOTIFY_DISPATCH_CONFIG"
    )]
    pub config: PathBuf,

    /// Message title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Message body
    #[arg(long, default_value = "")]
    pub body: String,

    /// Message category (checked against allowed_categories)
    #[arg(long)]
    pub category: Option<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "notify.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "notify.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
