//! Chart renderer trait definition.

use crate::error::AlertError;
use crate::types::{ChartArtifact, MovingAverageSeries, PriceSeries};

/// Renders price history and its moving average to an image.
pub trait ChartRenderer: Send + Sync {
    /// Render the close, the moving average and the last `window` days.
    fn render(
        &self,
        series: &PriceSeries,
        moving_average: &MovingAverageSeries,
        window: usize,
    ) -> Result<ChartArtifact, AlertError>;
}
