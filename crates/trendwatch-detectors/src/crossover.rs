//! Close-versus-moving-average crossover detection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trendwatch_core::types::{BreachEvent, CrossDirection, MovingAverageSeries};

/// Result of comparing the last two observations against their MA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CrossoverOutcome {
    /// One of the last two MA values is undefined, or there are fewer than two points
    Indeterminate,
    /// Close stayed on the same side of the MA
    Unchanged { above: bool },
    /// Close switched sides between yesterday and today
    Crossed { direction: CrossDirection },
}

impl CrossoverOutcome {
    /// Whether this outcome requires action.
    pub fn is_breach(&self) -> bool {
        matches!(self, CrossoverOutcome::Crossed { .. })
    }

    /// The breach event, if any.
    pub fn event(&self) -> Option<BreachEvent> {
        match self {
            CrossoverOutcome::Crossed { direction } => Some(BreachEvent::MovingAverageCrossover {
                direction: *direction,
            }),
            _ => None,
        }
    }
}

/// Detects a flip of the close-above-MA relation.
///
/// "Above" is strict: a close equal to its MA counts as not above.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossoverDetector;

impl CrossoverDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Compare the last two closes with the aligned moving average.
    pub fn detect(&self, closes: &[Decimal], moving_average: &MovingAverageSeries) -> CrossoverOutcome {
        let n = closes.len();
        if n < 2 || moving_average.len() != n {
            return CrossoverOutcome::Indeterminate;
        }

        let values = moving_average.values();
        self.detect_pair((closes[n - 2], values[n - 2]), (closes[n - 1], values[n - 1]))
    }

    /// Compare two (close, MA) observations, oldest first.
    pub fn detect_pair(
        &self,
        previous: (Decimal, Option<Decimal>),
        latest: (Decimal, Option<Decimal>),
    ) -> CrossoverOutcome {
        let (Some(prev_ma), Some(last_ma)) = (previous.1, latest.1) else {
            return CrossoverOutcome::Indeterminate;
        };

        let was_above = previous.0 > prev_ma;
        let is_above = latest.0 > last_ma;

        if was_above == is_above {
            CrossoverOutcome::Unchanged { above: is_above }
        } else if is_above {
            CrossoverOutcome::Crossed {
                direction: CrossDirection::Up,
            }
        } else {
            CrossoverOutcome::Crossed {
                direction: CrossDirection::Down,
            }
        }
    }
}
