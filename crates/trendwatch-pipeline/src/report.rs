//! Run report generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trendwatch_core::types::{BreachEvent, Notification};
use trendwatch_detectors::{CrossoverOutcome, DrawdownReport, ReturnEvaluation};
use trendwatch_notify::DeliveryOutcome;

/// Everything computed for one ticker in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub ticker: String,
    /// Date of the latest observation
    pub date: NaiveDate,
    pub window: usize,
    pub latest_close: Decimal,
    pub moving_average: Decimal,
    pub crossover: CrossoverOutcome,
    pub drawdown: DrawdownReport,
    pub returns: ReturnEvaluation,
    pub events: Vec<BreachEvent>,
    pub notification: Notification,
    /// Saved copy of the chart, when a chart directory is configured
    pub chart_path: Option<PathBuf>,
    pub delivery: DeliveryOutcome,
}

impl RunReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!("  {}  {}\n", self.ticker, self.date));
        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!("  Close:               {:.2}\n", self.latest_close));
        s.push_str(&format!(
            "  {}-day MA:{:>w$}{:.2}\n",
            self.window,
            "",
            self.moving_average,
            w = 13usize.saturating_sub(self.window.to_string().len())
        ));
        s.push_str(&format!(
            "  Drawdown:            {}%\n",
            self.drawdown.current_drawdown_pct
        ));
        s.push_str(&format!("  Positions:           {}\n", self.returns.rows.len()));
        s.push_str(&format!("  Subject:             {}\n", self.notification.subject));

        if self.events.is_empty() {
            s.push_str("  Events:              none\n");
        } else {
            s.push_str("  Events:\n");
            for event in &self.events {
                s.push_str(&format!("    - {}\n", event));
            }
        }

        let delivery = match &self.delivery {
            DeliveryOutcome::Delivered { attempts } => format!("delivered ({} attempt(s))", attempts),
            DeliveryOutcome::Failed { attempts, reason } => {
                format!("FAILED after {} attempt(s): {}", attempts, reason)
            }
            DeliveryOutcome::Disabled => "disabled".to_string(),
        };
        s.push_str(&format!("  Delivery:            {}\n", delivery));

        if let Some(path) = &self.chart_path {
            s.push_str(&format!("  Chart:               {}\n", path.display()));
        }

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A ticker whose run aborted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub reason: String,
}

/// Results of a multi-ticker invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub reports: Vec<RunReport>,
    pub failures: Vec<TickerFailure>,
}

impl BatchReport {
    /// Runs whose notification was lost.
    pub fn delivery_failures(&self) -> impl Iterator<Item = &RunReport> {
        self.reports.iter().filter(|r| r.delivery.is_failure())
    }

    /// Whether any ticker aborted before composing a notification.
    pub fn has_ticker_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Generate a text summary of every run.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        for report in &self.reports {
            s.push_str(&report.summary());
            s.push('\n');
        }

        for failure in &self.failures {
            s.push_str(&format!("  {}: FAILED: {}\n", failure.ticker, failure.reason));
        }

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
