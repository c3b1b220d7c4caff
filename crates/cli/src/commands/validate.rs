//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{Provider, PushConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    provider: Provider,
    active: bool,
    endpoint: String,
    category_count: usize,
    min_interval_seconds: f64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    provider: config.provider,
                    active: config.is_active(),
                    endpoint: config.endpoint_base().to_string(),
                    category_count: config.allowed_categories.len(),
                    min_interval_seconds: config.min_interval_seconds,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &PushConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.enabled {
        warnings.push("enabled = false - every message will be dropped".to_string());
    } else if config.token.is_empty() {
        warnings.push("enabled without token - every message will be dropped".to_string());
    }

    if config.min_interval_seconds == 0.0 {
        warnings.push("min_interval_seconds = 0 - sends are not rate limited".to_string());
    }

    if config.allowed_categories.is_empty() {
        warnings.push("allowed_categories is empty - every category is forwarded".to_string());
    }

    if config.endpoint_base().starts_with("http://") {
        warnings.push("endpoint uses plain http - token is sent unencrypted".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Provider: {}", summary.provider.name());
            println!("  Active: {}", summary.active);
            println!("  Endpoint: {}", summary.endpoint);
            println!("  Categories: {}", summary.category_count);
            println!("  Min interval: {}s", summary.min_interval_seconds);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_warnings_for_disabled_config() {
        let warnings = collect_warnings(&PushConfig::default());
        assert!(warnings.iter().any(|w| w.starts_with("enabled = false")));
        assert!(warnings.iter().any(|w| w.contains("plain http")));
    }

    #[test]
    fn test_no_token_warning_for_https_config() {
        let config = PushConfig {
            endpoint: Some("https://push.example.com".into()),
            allowed_categories: vec!["download".into()],
            ..PushConfig::with_token("T1")
        };
        assert!(collect_warnings(&config).is_empty());
    }

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            config: "/nonexistent/notify.toml".into(),
            json: true,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().starts_with("File not found"));
    }

    #[test]
    fn test_validate_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "enabled = true\ntoken = \"T1\"\nprovider = \"token_body\"").unwrap();

        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.provider, Provider::TokenBody);
        assert!(summary.active);
    }
}
