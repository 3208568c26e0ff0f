//! First-time drawdown band detection.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trendwatch_core::error::IndicatorError;
use trendwatch_core::types::BreachEvent;

use crate::percent::round_pct;

/// Drawdown of the latest close from the all-time high.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownReport {
    /// A band was entered for the first time today
    pub breached: bool,
    /// The lowest newly entered band, when `breached`
    pub level: Option<u32>,
    /// Current drawdown in percent, rounded to one decimal
    pub current_drawdown_pct: Decimal,
    /// Highest close in the series
    pub all_time_high: Decimal,
}

impl DrawdownReport {
    /// The breach event, if any.
    pub fn event(&self) -> Option<BreachEvent> {
        self.level
            .filter(|_| self.breached)
            .map(|level| BreachEvent::DrawdownThreshold { level })
    }
}

/// Fires once per drawdown band (10%, 20%, ...) the first time the series
/// enters it.
///
/// History is rescanned on every call. Each earlier point's drawdown is
/// measured against the running high up to that point, so a band visited
/// before a recovery stays visited.
#[derive(Debug, Clone, Copy)]
pub struct DrawdownDetector {
    step: u32,
}

impl Default for DrawdownDetector {
    fn default() -> Self {
        Self { step: 10 }
    }
}

impl DrawdownDetector {
    /// Create a detector with 10% bands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the full close history, oldest first.
    pub fn detect(&self, closes: &[Decimal]) -> Result<DrawdownReport, IndicatorError> {
        let Some((&last, history)) = closes.split_last() else {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                available: 0,
            });
        };

        let mut running_high = Decimal::MIN;
        let mut deepest_before = Decimal::ZERO;
        for &close in history {
            running_high = running_high.max(close);
            deepest_before = deepest_before.max(drawdown_pct(close, running_high));
        }

        let all_time_high = running_high.max(last);
        let current = drawdown_pct(last, all_time_high);

        let mut report = DrawdownReport {
            breached: false,
            level: None,
            current_drawdown_pct: current,
            all_time_high,
        };

        let step = Decimal::from(self.step);
        if current < step {
            return Ok(report);
        }

        let deepest_band = current.floor().to_u32().unwrap_or(u32::MAX);
        for level in (self.step..=deepest_band).step_by(self.step as usize) {
            let threshold = Decimal::from(level);
            let now_breached = current >= threshold;
            let previously_breached = deepest_before >= threshold;

            if now_breached && !previously_breached {
                report.breached = true;
                report.level = Some(level);
                break;
            }
        }

        debug!(
            current = %current,
            deepest_before = %deepest_before,
            level = ?report.level,
            "Evaluated drawdown bands"
        );

        Ok(report)
    }
}

/// Percentage below `high`, rounded to one decimal.
fn drawdown_pct(close: Decimal, high: Decimal) -> Decimal {
    if high <= Decimal::ZERO {
        return round_pct(Decimal::ZERO);
    }
    round_pct((Decimal::ONE - close / high) * dec!(100))
}
