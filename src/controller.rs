//! The scan controller: raster traversal, pause/abort handling, and
//! per-point emission.
//!
//! One [`ScanController`] invocation executes one scan. The controller
//! owns both axis handles exclusively for the scan's duration and is the
//! only reader of the control signal; the operator channel is its only
//! writer. The controller suspends at exactly one kind of point —
//! [`ControlWatch::wait_until_runnable`] — once per row and once per grid
//! point, so cancellation is cooperative: a motion command already issued
//! always completes before the next check.

use chrono::Utc;
use std::time::Duration;

use crate::control::{ControlState, ControlWatch};
use crate::error::{ScanError, ScanResult};
use crate::hardware::{Axis, AxisId};
use crate::point::GridPoint;
use crate::progress::ProgressSink;
use crate::region::ScanRegion;
use crate::storage::RecordStore;

/// Terminal outcome of one scan invocation.
#[derive(Debug)]
pub enum ScanOutcome {
    /// Every grid point was visited.
    Completed,
    /// The operator stopped the scan before completion.
    Aborted,
    /// A region or device fault terminated the scan.
    Failed(ScanError),
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanOutcome::Completed => write!(f, "scan completed"),
            ScanOutcome::Aborted => write!(f, "scan stopped by operator"),
            ScanOutcome::Failed(err) => write!(f, "scan failed: {err}"),
        }
    }
}

/// Aggregate result of one controller invocation.
#[derive(Debug)]
pub struct ScanRun {
    /// Region the scan was asked to traverse.
    pub region: ScanRegion,
    /// Every emitted point, in emission order (strictly row-major).
    pub points: Vec<GridPoint>,
    /// Points whose persistence failed; the points themselves are still
    /// in `points`.
    pub skipped_persists: usize,
    /// Terminal outcome.
    pub outcome: ScanOutcome,
}

/// Drives one raster scan over a [`ScanRegion`].
pub struct ScanController {
    axis_x: Box<dyn Axis>,
    axis_y: Box<dyn Axis>,
    sink: Box<dyn ProgressSink>,
    store: Box<dyn RecordStore>,
    control: ControlWatch,
    period: Duration,
}

impl ScanController {
    /// Assemble a controller from its collaborators. The axis handles are
    /// owned exclusively until the run returns.
    pub fn new(
        axis_x: Box<dyn Axis>,
        axis_y: Box<dyn Axis>,
        sink: Box<dyn ProgressSink>,
        store: Box<dyn RecordStore>,
        control: ControlWatch,
    ) -> Self {
        Self {
            axis_x,
            axis_y,
            sink,
            store,
            control,
            period: Duration::ZERO,
        }
    }

    /// Set the fixed inter-point delay (the live-plot cadence).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Execute one raster scan and report its outcome.
    ///
    /// Never panics; every failure mode ends up in the returned
    /// [`ScanRun::outcome`]. Records persisted before a fault or abort
    /// are kept, never rolled back.
    pub async fn run(mut self, region: ScanRegion) -> ScanRun {
        if let Err(err) = region.validate() {
            log::error!("{err}");
            return ScanRun {
                region,
                points: Vec::new(),
                skipped_persists: 0,
                outcome: ScanOutcome::Failed(err),
            };
        }

        log::info!(
            "starting raster scan: {} x {} points, {} mm step",
            region.steps_x(),
            region.steps_y(),
            region.step_size_mm
        );

        let mut points = Vec::with_capacity(region.num_points());
        let mut skipped_persists = 0;
        let outcome = match self.raster(region, &mut points, &mut skipped_persists).await {
            Ok(true) => ScanOutcome::Completed,
            Ok(false) => ScanOutcome::Aborted,
            Err(err) => ScanOutcome::Failed(err),
        };

        if let Err(err) = self.sink.flush().await {
            log::warn!("progress sink flush failed: {err:#}");
        }

        ScanRun {
            region,
            points,
            skipped_persists,
            outcome,
        }
    }

    /// Row-major traversal. `Ok(true)` means every point was visited,
    /// `Ok(false)` means the operator stopped the scan.
    async fn raster(
        &mut self,
        region: ScanRegion,
        points: &mut Vec<GridPoint>,
        skipped_persists: &mut usize,
    ) -> ScanResult<bool> {
        let steps_x = region.steps_x();
        let steps_y = region.steps_y();
        let step = region.step_size_mm;

        for index_x in 0..steps_x {
            if self.control.wait_until_runnable().await == ControlState::Stopped {
                return Ok(false);
            }

            self.axis_x
                .move_relative(step)
                .await
                .map_err(|source| ScanError::MotionFault {
                    axis: AxisId::X,
                    source,
                })?;
            // Row-reset: each new column re-zeros Y travel instead of
            // accumulating position across rows.
            self.axis_y.home().await.map_err(|source| ScanError::MotionFault {
                axis: AxisId::Y,
                source,
            })?;

            for index_y in 0..steps_y {
                if self.control.wait_until_runnable().await == ControlState::Stopped {
                    return Ok(false);
                }

                self.axis_y
                    .move_relative(step)
                    .await
                    .map_err(|source| ScanError::MotionFault {
                        axis: AxisId::Y,
                        source,
                    })?;

                let position_x_mm =
                    self.axis_x
                        .position()
                        .await
                        .map_err(|source| ScanError::ReadFault {
                            axis: AxisId::X,
                            source,
                        })?;
                let position_y_mm =
                    self.axis_y
                        .position()
                        .await
                        .map_err(|source| ScanError::ReadFault {
                            axis: AxisId::Y,
                            source,
                        })?;

                let point = GridPoint {
                    index_x,
                    index_y,
                    position_x_mm,
                    position_y_mm,
                    timestamp: Utc::now(),
                };

                if let Err(err) = self.sink.emit(&point).await {
                    log::warn!(
                        "progress sink rejected point ({index_x}, {index_y}): {err:#}"
                    );
                }
                if let Err(err) = self.store.persist(&point).await {
                    log::warn!("failed to persist point ({index_x}, {index_y}): {err:#}");
                    *skipped_persists += 1;
                }
                points.push(point);

                if !self.period.is_zero() {
                    tokio::time::sleep(self.period).await;
                }
            }
        }

        Ok(true)
    }
}
