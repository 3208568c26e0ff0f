//! Alert run command implementation.

use anyhow::{bail, Context, Result};
use chrono::Months;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use trendwatch_config::{AppConfig, ProviderKind};
use trendwatch_core::traits::PriceSeriesProvider;
use trendwatch_data::{AlphaVantageConfig, AlphaVantageProvider, CsvProvider};
use trendwatch_notify::{DeliveryPolicy, SmtpConfig, SmtpMailer, SvgChartRenderer};
use trendwatch_pipeline::{AlertPipeline, PipelineConfig};

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config: &AppConfig) -> Result<()> {
    config.validate()?;

    let window = args.window.unwrap_or(config.alerts.default_window);
    if window == 0 {
        bail!("--window must be at least 1");
    }

    let tickers: Vec<String> = args.tickers.iter().map(|t| t.to_uppercase()).collect();
    info!(app = %config.app.name, tickers = ?tickers, window, "Starting alert run");

    let provider = build_provider(config)?;
    let renderer = SvgChartRenderer::new(config.chart.width, config.chart.height);

    let mut pipeline_config = PipelineConfig {
        window,
        lookback: Months::new(config.provider.lookback_months),
        return_threshold_pct: config.alerts.return_threshold_pct,
        positions: config.positions_by_ticker(),
        recipients: Vec::new(),
        chart_dir: config.chart.output_dir.as_ref().map(PathBuf::from),
        delivery: DeliveryPolicy {
            max_attempts: config.mail.max_attempts,
            initial_backoff: Duration::from_millis(config.mail.initial_backoff_ms),
        },
    };

    let pipeline = if config.mail.enabled {
        let smtp = SmtpConfig::from_env(
            config.mail.smtp_host.clone(),
            config.mail.smtp_port,
            &config.mail.username_env,
            &config.mail.password_env,
        )
        .context("Mail is enabled but SMTP credentials are missing")?;
        let mailer = SmtpMailer::new(smtp)?;

        pipeline_config.recipients = parse_recipients(
            std::env::var(&config.mail.recipients_env).ok().as_deref(),
            &mailer.sender().email.to_string(),
        );
        info!(recipients = pipeline_config.recipients.len(), "Mail delivery enabled");

        AlertPipeline::new(pipeline_config, provider, Box::new(renderer))
            .with_transport(Box::new(mailer))
    } else {
        info!("Mail delivery disabled");
        AlertPipeline::new(pipeline_config, provider, Box::new(renderer))
    };

    let batch = pipeline.run_all(&tickers).await;

    // Output results
    match args.output.as_str() {
        "json" => {
            let json = batch.to_json()?;
            println!("{}", json);
        }
        _ => {
            println!("{}", batch.summary());
        }
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let json = batch.to_json()?;
        std::fs::write(save_path, json)?;
        info!("Results saved to {:?}", save_path);
    }

    if batch.has_ticker_failures() {
        bail!("{} of {} ticker(s) failed", batch.failures.len(), tickers.len());
    }

    let undelivered = batch.delivery_failures().count();
    if undelivered > 0 && config.mail.fail_on_error {
        bail!("{} notification(s) could not be delivered", undelivered);
    }

    Ok(())
}

fn build_provider(config: &AppConfig) -> Result<Box<dyn PriceSeriesProvider>> {
    let provider: Box<dyn PriceSeriesProvider> = match config.provider.kind {
        ProviderKind::AlphaVantage => {
            let av = AlphaVantageConfig::from_env(
                &config.provider.api_key_env,
                config.provider.base_url.clone(),
            )?;
            Box::new(AlphaVantageProvider::new(av)?)
        }
        ProviderKind::Csv => {
            let Some(dir) = &config.provider.csv_dir else {
                bail!("provider.csv_dir is required for the csv provider");
            };
            Box::new(CsvProvider::new(dir.as_str())?)
        }
    };

    info!(provider = provider.name(), "Price provider ready");
    Ok(provider)
}

/// Comma-separated recipients, falling back to the sender.
fn parse_recipients(raw: Option<&str>, sender: &str) -> Vec<String> {
    let recipients: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    if recipients.is_empty() {
        vec![sender.to_string()]
    } else {
        recipients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipients_default_to_sender() {
        assert_eq!(
            parse_recipients(None, "me@example.com"),
            vec!["me@example.com".to_string()]
        );
        assert_eq!(
            parse_recipients(Some(" , "), "me@example.com"),
            vec!["me@example.com".to_string()]
        );
    }

    #[test]
    fn test_recipients_split_on_commas() {
        assert_eq!(
            parse_recipients(Some("a@example.com, b@example.com"), "me@example.com"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }
}
