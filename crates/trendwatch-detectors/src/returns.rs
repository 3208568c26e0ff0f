//! Position return evaluation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use trendwatch_core::error::IndicatorError;
use trendwatch_core::types::{BreachEvent, Position};

use crate::percent::round_pct;

/// Return of one position at the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReturn {
    /// The configured position
    pub position: Position,
    /// Return in percent, rounded to one decimal
    pub return_pct: Decimal,
    /// Current value of the investment, rounded to cents
    pub current_value: Decimal,
    /// Return is above the threshold
    pub breached: bool,
}

/// Returns for every position, in configuration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEvaluation {
    /// Price the returns were computed against
    pub current_price: Decimal,
    /// Threshold in percent
    pub threshold_pct: Decimal,
    /// One row per position
    pub rows: Vec<PositionReturn>,
}

impl ReturnEvaluation {
    /// Whether any position exceeded the threshold.
    pub fn breached(&self) -> bool {
        self.rows.iter().any(|r| r.breached)
    }

    /// One event per position above the threshold.
    pub fn events(&self) -> Vec<BreachEvent> {
        self.rows
            .iter()
            .filter(|r| r.breached)
            .map(|r| BreachEvent::ReturnThreshold {
                position: r.position.clone(),
                return_pct: r.return_pct,
            })
            .collect()
    }
}

/// Flags positions whose return exceeds a threshold.
#[derive(Debug, Clone, Copy)]
pub struct ReturnEvaluator {
    threshold_pct: Decimal,
}

impl Default for ReturnEvaluator {
    fn default() -> Self {
        Self {
            threshold_pct: dec!(20),
        }
    }
}

impl ReturnEvaluator {
    /// Create an evaluator with a custom threshold in percent.
    pub fn new(threshold_pct: Decimal) -> Self {
        Self { threshold_pct }
    }

    /// Evaluate every position against `current_price`.
    pub fn evaluate(
        &self,
        positions: &[Position],
        current_price: Decimal,
    ) -> Result<ReturnEvaluation, IndicatorError> {
        let rows = positions
            .iter()
            .map(|position| {
                if position.buy_price <= Decimal::ZERO {
                    return Err(IndicatorError::InvalidParameter(format!(
                        "{} has non-positive buy price {}",
                        position.label, position.buy_price
                    )));
                }

                let return_pct =
                    round_pct(dec!(100) * (current_price - position.buy_price) / position.buy_price);
                let current_value =
                    (position.investment * current_price / position.buy_price).round_dp(2);

                Ok(PositionReturn {
                    position: position.clone(),
                    return_pct,
                    current_value,
                    breached: return_pct > self.threshold_pct,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReturnEvaluation {
            current_price,
            threshold_pct: self.threshold_pct,
            rows,
        })
    }
}
