//! # Notify Dispatch CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 从 stdin 读取消息并限流推送
//! - 优雅关闭处理

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_dispatch, run_info, run_send, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Notify Dispatch CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_dispatch(args).await,
        Commands::Send(args) => run_send(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else {
        let default_level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    observability::init_tracing(cli.log_format.into(), filter)
}
