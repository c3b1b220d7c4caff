//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{Provider, PushConfig};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    enabled: bool,
    active: bool,
    token: String,
    provider: Provider,
    endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_prefix: Option<String>,
    allowed_categories: Vec<String>,
    min_interval_seconds: f64,
    request_timeout_seconds: u64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let config = load_config(&args.config)?;
    let info = build_config_info(&config);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &PushConfig) -> ConfigInfo {
    ConfigInfo {
        enabled: config.enabled,
        active: config.is_active(),
        token: mask_token(&config.token),
        provider: config.provider,
        endpoint: config.endpoint_base().to_string(),
        title_prefix: config.title_prefix.clone(),
        allowed_categories: config
            .allowed_categories
            .iter()
            .map(|c| c.to_string())
            .collect(),
        min_interval_seconds: config.min_interval_seconds,
        request_timeout_seconds: config.request_timeout_seconds,
    }
}

/// Keep the first and last two characters of a token
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    match chars.len() {
        0 => "(none)".to_string(),
        n if n <= 6 => "*".repeat(n),
        n => {
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[n - 2..].iter().collect();
            format!("{head}{}{tail}", "*".repeat(n - 4))
        }
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Notify Dispatch Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📡 Provider");
    println!("   ├─ Type: {}", info.provider.name());
    println!("   ├─ Endpoint: {}", info.endpoint);
    println!("   ├─ Token: {}", info.token);
    match &info.title_prefix {
        Some(prefix) => println!("   └─ Title prefix: {prefix}"),
        None => println!("   └─ Title prefix: (none)"),
    }

    println!("\n⚙️  Dispatch");
    println!("   ├─ Enabled: {}", info.enabled);
    println!("   ├─ Active: {}", info.active);
    println!("   ├─ Min interval: {}s", info.min_interval_seconds);
    println!("   └─ Request timeout: {}s", info.request_timeout_seconds);

    if info.allowed_categories.is_empty() {
        println!("\n🏷  Categories: all");
    } else {
        println!("\n🏷  Categories ({})", info.allowed_categories.len());
        for (i, category) in info.allowed_categories.iter().enumerate() {
            let prefix = if i == info.allowed_categories.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("   {} {}", prefix, category);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(""), "(none)");
        assert_eq!(mask_token("T1"), "**");
        assert_eq!(mask_token("abcdefgh"), "ab****gh");
    }

    #[test]
    fn test_info_never_contains_token() {
        let config = PushConfig::with_token("secret-token-123");
        let info = build_config_info(&config);
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("secret-token-123"));
        assert!(json.contains("\"provider\":\"meow\""));
    }
}
