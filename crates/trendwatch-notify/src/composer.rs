//! Alert email composition.

use askama::Template;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use trendwatch_core::error::AlertError;
use trendwatch_core::types::{CrossDirection, Notification};
use trendwatch_detectors::{CrossoverOutcome, DrawdownReport, ReturnEvaluation};

/// Detector results for one ticker on one day.
#[derive(Debug, Clone)]
pub struct AlertSummary<'a> {
    pub ticker: &'a str,
    /// Date of the latest observation
    pub date: NaiveDate,
    pub window: usize,
    pub latest_close: Decimal,
    pub moving_average: Option<Decimal>,
    pub crossover: CrossoverOutcome,
    pub drawdown: &'a DrawdownReport,
    pub returns: &'a ReturnEvaluation,
}

impl AlertSummary<'_> {
    /// Whether any of the three breach kinds fired.
    pub fn action_required(&self) -> bool {
        self.crossover.is_breach() || self.drawdown.breached || self.returns.breached()
    }
}

#[derive(Template)]
#[template(path = "alert.html")]
struct AlertHtml<'a> {
    headline: String,
    date: NaiveDate,
    window: usize,
    close: String,
    moving_average: String,
    all_time_high: String,
    drawdown_pct: Decimal,
    drawdown_alerts: Vec<String>,
    threshold_pct: Decimal,
    positions: Vec<PositionRow<'a>>,
    return_alerts: Vec<String>,
}

struct PositionRow<'a> {
    label: &'a str,
    invested: String,
    buy_price: String,
    return_pct: Decimal,
    value: String,
    breached: bool,
}

/// Builds subject and bodies from detector results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationComposer;

impl NotificationComposer {
    /// Create a new composer.
    pub fn new() -> Self {
        Self
    }

    /// Compose the notification for one ticker.
    pub fn compose(&self, summary: &AlertSummary<'_>) -> Result<Notification, AlertError> {
        let action_required = summary.action_required();

        let mut subject = format!("{} Notification {}", summary.ticker, summary.date);
        if action_required {
            subject.push_str(" [ACTION REQUIRED]");
        }

        Ok(Notification {
            subject,
            text_body: self.text_body(summary),
            html_body: self.html_body(summary)?,
            action_required,
        })
    }

    fn crossover_sentence(&self, summary: &AlertSummary<'_>) -> String {
        let ticker = summary.ticker;
        let window = summary.window;

        match summary.crossover {
            CrossoverOutcome::Crossed {
                direction: CrossDirection::Down,
            } => format!(
                "{ticker} breached its {window}-day moving average downwards. \
                 Please sell your position until {ticker} is trading above its MA again."
            ),
            CrossoverOutcome::Crossed {
                direction: CrossDirection::Up,
            } => format!(
                "{ticker} breached its {window}-day moving average upwards. Please create a buy order."
            ),
            CrossoverOutcome::Unchanged { .. } => format!(
                "No action required, {ticker} did not cross its {window}-day moving average."
            ),
            CrossoverOutcome::Indeterminate => format!(
                "Not enough history to compare {ticker} with its {window}-day moving average \
                 on both of the last two days."
            ),
        }
    }

    fn drawdown_sentence(&self, summary: &AlertSummary<'_>) -> Option<String> {
        let level = summary.drawdown.level.filter(|_| summary.drawdown.breached)?;
        Some(format!(
            "{} is down {}% from its all-time high, entering the {}% band for the first time.",
            summary.ticker, summary.drawdown.current_drawdown_pct, level
        ))
    }

    fn return_sentences(&self, summary: &AlertSummary<'_>) -> Vec<String> {
        summary
            .returns
            .rows
            .iter()
            .filter(|r| r.breached)
            .map(|r| {
                format!(
                    "{} returned {}%, above the {}% threshold. Consider taking profit.",
                    r.position.label, r.return_pct, summary.returns.threshold_pct
                )
            })
            .collect()
    }

    fn text_body(&self, summary: &AlertSummary<'_>) -> String {
        let mut s = String::new();

        s.push_str(&self.crossover_sentence(summary));
        s.push_str("\n\n");

        s.push_str(&format!(
            "Close ({}):            {:.2}\n",
            summary.date, summary.latest_close
        ));
        match summary.moving_average {
            Some(ma) => s.push_str(&format!(
                "{}-day MA:            {:.2}\n",
                summary.window, ma
            )),
            None => s.push_str(&format!("{}-day MA:            n/a\n", summary.window)),
        }
        s.push_str(&format!(
            "All-time high:          {:.2}\n",
            summary.drawdown.all_time_high
        ));
        s.push_str(&format!(
            "Drawdown:               {}%\n",
            summary.drawdown.current_drawdown_pct
        ));

        if let Some(sentence) = self.drawdown_sentence(summary) {
            s.push('\n');
            s.push_str(&sentence);
            s.push('\n');
        }

        if !summary.returns.rows.is_empty() {
            s.push_str(&format!(
                "\nPositions (alert above {}% return)\n",
                summary.returns.threshold_pct
            ));
            s.push_str("───────────────────────────────────────────────────────────\n");
            for row in &summary.returns.rows {
                s.push_str(&format!(
                    "  {:<12} invested {:>10.2}  bought at {:>9.2}  return {:>6}%  value {:>10.2}\n",
                    row.position.label,
                    row.position.investment,
                    row.position.buy_price,
                    row.return_pct,
                    row.current_value
                ));
            }

            for sentence in self.return_sentences(summary) {
                s.push('\n');
                s.push_str(&sentence);
            }
            s.push('\n');
        }

        s
    }

    fn html_body(&self, summary: &AlertSummary<'_>) -> Result<String, AlertError> {
        let page = AlertHtml {
            headline: self.crossover_sentence(summary),
            date: summary.date,
            window: summary.window,
            close: format!("{:.2}", summary.latest_close),
            moving_average: summary
                .moving_average
                .map(|ma| format!("{:.2}", ma))
                .unwrap_or_else(|| "n/a".to_string()),
            all_time_high: format!("{:.2}", summary.drawdown.all_time_high),
            drawdown_pct: summary.drawdown.current_drawdown_pct,
            drawdown_alerts: self.drawdown_sentence(summary).into_iter().collect(),
            threshold_pct: summary.returns.threshold_pct,
            positions: summary
                .returns
                .rows
                .iter()
                .map(|row| PositionRow {
                    label: &row.position.label,
                    invested: format!("{:.2}", row.position.investment),
                    buy_price: format!("{:.2}", row.position.buy_price),
                    return_pct: row.return_pct,
                    value: format!("{:.2}", row.current_value),
                    breached: row.breached,
                })
                .collect(),
            return_alerts: self.return_sentences(summary),
        };

        page.render().map_err(|e| AlertError::Template(e.to_string()))
    }
}
