//! Alert pipeline engine.

use chrono::Months;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use trendwatch_core::error::{AlertResult, IndicatorError};
use trendwatch_core::traits::{ChartRenderer, Indicator, MailTransport, PriceSeriesProvider};
use trendwatch_core::types::{BreachEvent, OutgoingMail, Position};
use trendwatch_detectors::{CrossoverDetector, CrossoverOutcome, DrawdownDetector, ReturnEvaluator};
use trendwatch_indicators::Sma;
use trendwatch_notify::{
    deliver, write_run_scoped, AlertSummary, DeliveryOutcome, DeliveryPolicy, NotificationComposer,
};

use crate::report::{BatchReport, RunReport, TickerFailure};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Moving average window in trading days
    pub window: usize,
    /// History requested from the provider
    pub lookback: Months,
    /// Position return alert threshold in percent
    pub return_threshold_pct: Decimal,
    /// Static positions keyed by upper-case ticker
    pub positions: HashMap<String, Vec<Position>>,
    /// Notification recipients
    pub recipients: Vec<String>,
    /// Keep a copy of each chart here, under a run-scoped name
    pub chart_dir: Option<PathBuf>,
    /// Mail retry policy
    pub delivery: DeliveryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: 200,
            lookback: Months::new(24),
            return_threshold_pct: dec!(20),
            positions: HashMap::new(),
            recipients: Vec::new(),
            chart_dir: None,
            delivery: DeliveryPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Add positions for a ticker.
    pub fn with_positions(mut self, ticker: &str, positions: Vec<Position>) -> Self {
        self.positions
            .entry(ticker.to_uppercase())
            .or_default()
            .extend(positions);
        self
    }

    fn positions_for(&self, ticker: &str) -> &[Position] {
        self.positions
            .get(&ticker.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Runs fetch, detection and notification for each ticker.
pub struct AlertPipeline {
    config: PipelineConfig,
    provider: Box<dyn PriceSeriesProvider>,
    renderer: Box<dyn ChartRenderer>,
    transport: Option<Box<dyn MailTransport>>,
    composer: NotificationComposer,
}

impl AlertPipeline {
    /// Create a pipeline without a mail transport; deliveries are skipped.
    pub fn new(
        config: PipelineConfig,
        provider: Box<dyn PriceSeriesProvider>,
        renderer: Box<dyn ChartRenderer>,
    ) -> Self {
        Self {
            config,
            provider,
            renderer,
            transport: None,
            composer: NotificationComposer::new(),
        }
    }

    /// Deliver notifications through `transport`.
    pub fn with_transport(mut self, transport: Box<dyn MailTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Run every ticker in order. A failing ticker does not stop the others.
    pub async fn run_all(&self, tickers: &[String]) -> BatchReport {
        let mut batch = BatchReport::default();

        for ticker in tickers {
            match self.run_ticker(ticker).await {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    error!(ticker = %ticker, error = %e, "Pipeline run failed");
                    batch.failures.push(TickerFailure {
                        ticker: ticker.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        batch
    }

    /// Run the pipeline for one ticker.
    ///
    /// Data and indicator failures abort the run. Chart and mail failures
    /// are logged and recorded in the report.
    pub async fn run_ticker(&self, ticker: &str) -> AlertResult<RunReport> {
        let window = self.config.window;
        info!(
            ticker,
            window,
            provider = self.provider.name(),
            "Starting alert run"
        );

        let series = self.provider.fetch_daily(ticker, self.config.lookback).await?;
        let closes = series.closes();

        let sma = Sma::new(window)?;
        sma.validate_data(&closes)?;
        debug!(
            ticker,
            indicator = sma.name(),
            period = sma.period(),
            points = closes.len(),
            "Computing moving average"
        );
        let moving_average = sma.series(&closes);
        let ma_value = moving_average.require_last()?;

        // Crossover needs a defined MA on both of the last two days.
        let crossover = CrossoverDetector::new().detect(&closes, &moving_average);
        if crossover == CrossoverOutcome::Indeterminate {
            return Err(IndicatorError::InsufficientData {
                required: window + 1,
                available: closes.len(),
            }
            .into());
        }

        let drawdown = DrawdownDetector::new().detect(&closes)?;

        let latest = series
            .last()
            .ok_or(IndicatorError::InsufficientData {
                required: 1,
                available: 0,
            })?
            .clone();

        let returns = ReturnEvaluator::new(self.config.return_threshold_pct)
            .evaluate(self.config.positions_for(ticker), latest.close)?;

        let events: Vec<BreachEvent> = crossover
            .event()
            .into_iter()
            .chain(drawdown.event())
            .chain(returns.events())
            .collect();

        for event in &events {
            info!(ticker, event = %event, "Breach detected");
        }

        let summary = AlertSummary {
            ticker: &series.ticker,
            date: latest.date,
            window,
            latest_close: latest.close,
            moving_average: Some(ma_value),
            crossover,
            drawdown: &drawdown,
            returns: &returns,
        };
        let notification = self.composer.compose(&summary)?;

        let chart = match self.renderer.render(&series, &moving_average, window) {
            Ok(chart) => Some(chart),
            Err(e) => {
                warn!(ticker, error = %e, "Chart rendering failed, sending without attachment");
                None
            }
        };

        let chart_path = match (&chart, &self.config.chart_dir) {
            (Some(chart), Some(dir)) => match write_run_scoped(chart, dir) {
                Ok(path) => {
                    info!(ticker, path = %path.display(), "Chart saved");
                    Some(path)
                }
                Err(e) => {
                    warn!(ticker, error = %e, "Could not save chart");
                    None
                }
            },
            _ => None,
        };

        let mail = OutgoingMail {
            notification: notification.clone(),
            recipients: self.config.recipients.clone(),
            attachment: chart,
        };

        let delivery = match &self.transport {
            Some(transport) => deliver(transport.as_ref(), &mail, &self.config.delivery).await,
            None => {
                info!(ticker, subject = %notification.subject, "Mail disabled, skipping delivery");
                DeliveryOutcome::Disabled
            }
        };

        Ok(RunReport {
            ticker: series.ticker.clone(),
            date: latest.date,
            window,
            latest_close: latest.close,
            moving_average: ma_value,
            crossover,
            drawdown,
            returns,
            events,
            notification,
            chart_path,
            delivery,
        })
    }
}
