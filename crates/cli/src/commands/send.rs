//! `send` command implementation.

use anyhow::{Context, Result};
use contracts::{Message, Outcome, PushTransport};
use dispatcher::{filter, HttpTransport};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::SendArgs;
use crate::error::CliError;

/// Send result for JSON output
#[derive(Serialize)]
struct SendResult<'a> {
    provider: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<&'static str>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a Outcome>,
}

/// Execute the `send` command
///
/// Hands one message straight to the transport. Queue and rate limit are
/// bypassed; the category filter still applies.
pub async fn run_send(args: &SendArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    if !config.is_active() {
        anyhow::bail!("Push is disabled or has no token: {}", args.config.display());
    }

    let mut message = Message::new(args.title.clone(), args.body.clone());
    if let Some(ref category) = args.category {
        message = message.with_category(category.as_str());
    }
    if !message.has_content() {
        anyhow::bail!("title and body cannot both be empty");
    }

    let transport = HttpTransport::from_config(&config).map_err(CliError::from)?;
    info!(provider = transport.name(), url = transport.url(), "Sending message");

    let skipped = filter::check(&config, &message).skip_reason();
    let outcome = match skipped {
        Some(_) => None,
        None => Some(transport.send(&message).await),
    };

    if args.json {
        let result = SendResult {
            provider: transport.name(),
            url: transport.url(),
            skipped,
            outcome: outcome.as_ref(),
        };
        let json =
            serde_json::to_string_pretty(&result).context("Failed to serialize send result")?;
        println!("{}", json);
    } else {
        match (&outcome, skipped) {
            (Some(outcome), _) => println!("{}: {}", transport.name(), outcome),
            (None, Some(reason)) => println!("skipped ({reason})"),
            (None, None) => {}
        }
    }

    match outcome {
        Some(outcome) if !outcome.is_success() => anyhow::bail!("Send failed: {outcome}"),
        _ => Ok(()),
    }
}
