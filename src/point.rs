//! Sampled grid point data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sampled position on the scan grid.
///
/// Positions are the post-motion readback from the axes, not the
/// commanded targets, so they may differ slightly from the ideal grid.
/// Exactly one `GridPoint` is produced per `(index_x, index_y)` pair, in
/// row-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column index (outer raster loop), starting at 0.
    pub index_x: usize,
    /// Point index within the column (inner loop), starting at 0.
    pub index_y: usize,
    /// Measured X position in millimeters.
    pub position_x_mm: f64,
    /// Measured Y position in millimeters.
    pub position_y_mm: f64,
    /// UTC timestamp of the sample.
    pub timestamp: DateTime<Utc>,
}
