//! Mailshot one-shot sender.
//!
//! Reads a campaign as JSON from the file named by the first argument (or
//! stdin when absent or `-`), dispatches it and prints the report as JSON.
//! Exits 1 when the campaign is rejected before dispatch and 2 when any
//! recipient failed; failed recipients are listed on stderr.

use std::io::Read;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mailshot::{run_campaign, Config, DeliveryClient, RawCampaignInput};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        delivery_api_url = %config.delivery_api_url,
        send_interval_ms = config.send_interval_ms,
        "config_loaded"
    );

    let source = std::env::args().nth(1);
    let raw = read_campaign(source.as_deref())?;
    let input: RawCampaignInput =
        serde_json::from_str(&raw).context("Failed to parse campaign JSON")?;

    let client = DeliveryClient::new(&config.delivery_api_url, config.request_timeout())?;
    let settings = config.campaign_settings();

    match run_campaign(&client, input, &settings).await {
        Ok(report) => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);

            if report.result.failed_count() > 0 {
                for failure in report.result.failures() {
                    eprintln!("{}: {}", failure.recipient, failure.message);
                }
                std::process::exit(2);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "campaign_not_sent");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn read_campaign(source: Option<&str>) -> Result<String> {
    match source {
        None | Some("-") => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read campaign from stdin")?;
            Ok(raw)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read campaign file {}", path)),
    }
}
