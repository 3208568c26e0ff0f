//! Breach events produced by the detectors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Position;

/// Direction of a moving-average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossDirection {
    /// Close moved from at-or-below the MA to above it
    Up,
    /// Close moved from above the MA to at-or-below it
    Down,
}

impl fmt::Display for CrossDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossDirection::Up => write!(f, "upwards"),
            CrossDirection::Down => write!(f, "downwards"),
        }
    }
}

/// A condition that requires the recipient's attention.
///
/// Computed once per run and consumed by the composer; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreachEvent {
    /// Close crossed the moving average between the last two observations
    MovingAverageCrossover { direction: CrossDirection },
    /// Drawdown from the all-time high entered a band for the first time
    DrawdownThreshold { level: u32 },
    /// A position's return exceeded the configured threshold
    ReturnThreshold { position: Position, return_pct: Decimal },
}

impl fmt::Display for BreachEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreachEvent::MovingAverageCrossover { direction } => {
                write!(f, "moving average crossed {}", direction)
            }
            BreachEvent::DrawdownThreshold { level } => {
                write!(f, "drawdown reached {}% for the first time", level)
            }
            BreachEvent::ReturnThreshold {
                position,
                return_pct,
            } => write!(f, "{} returned {}%", position.label, return_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_display() {
        let crossover = BreachEvent::MovingAverageCrossover {
            direction: CrossDirection::Down,
        };
        assert_eq!(crossover.to_string(), "moving average crossed downwards");

        let ret = BreachEvent::ReturnThreshold {
            position: Position::new("BTD 1", dec!(1000), dec!(400)),
            return_pct: dec!(25.0),
        };
        assert_eq!(ret.to_string(), "BTD 1 returned 25.0%");
    }

    #[test]
    fn test_event_serializes_tagged() {
        let event = BreachEvent::DrawdownThreshold { level: 20 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"drawdown_threshold","level":20}"#);
    }
}
