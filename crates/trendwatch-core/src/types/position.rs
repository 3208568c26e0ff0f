//! Static buy-the-dip positions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A held position tracked for return alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Display name
    pub label: String,
    /// Amount invested
    pub investment: Decimal,
    /// Price paid per unit
    pub buy_price: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(label: impl Into<String>, investment: Decimal, buy_price: Decimal) -> Self {
        Self {
            label: label.into(),
            investment,
            buy_price,
        }
    }
}
