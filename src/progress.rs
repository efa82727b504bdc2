//! Live progress reporting.
//!
//! The renderer itself is an external collaborator; the controller only
//! sees the [`ProgressSink`] capability. Emission is best-effort: the
//! controller logs a sink failure and keeps scanning.

use anyhow::Result;
use async_trait::async_trait;

use crate::point::GridPoint;

/// Telemetry sink for scan progress.
#[async_trait]
pub trait ProgressSink: Send {
    /// Report one sampled grid point.
    async fn emit(&mut self, point: &GridPoint) -> Result<()>;

    /// Flush any buffered telemetry. Called once when the scan ends,
    /// whatever the outcome.
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Progress sink that reports each point to the log with a running count.
pub struct LogProgress {
    expected: usize,
    emitted: usize,
}

impl LogProgress {
    /// Create a sink expecting `expected` points for a full traversal.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            emitted: 0,
        }
    }
}

#[async_trait]
impl ProgressSink for LogProgress {
    async fn emit(&mut self, point: &GridPoint) -> Result<()> {
        self.emitted += 1;
        log::info!(
            "[{}/{}] point ({}, {}) at X={:.2} mm, Y={:.2} mm",
            self.emitted,
            self.expected,
            point.index_x,
            point.index_y,
            point.position_x_mm,
            point.position_y_mm
        );
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        log::info!("progress: {} of {} points reported", self.emitted, self.expected);
        Ok(())
    }
}
