//! Motion hardware capabilities.
//!
//! The scan controller works against the [`Axis`] trait instead of a
//! concrete stage driver, so experiment logic stays hardware-agnostic.
//! Implementations handle protocol-specific details; [`mock::MockAxis`]
//! provides a simulated stage for tests and for running without hardware.

pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Which of the two scan axes a handle drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisId {
    /// Primary (row) axis.
    X,
    /// Secondary (column) axis, re-homed at every row start.
    Y,
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisId::X => write!(f, "X"),
            AxisId::Y => write!(f, "Y"),
        }
    }
}

/// Single-degree-of-freedom motorized stage capability.
///
/// Motion commands block until the axis is idle again; the controller
/// never issues concurrent commands to one axis.
#[async_trait]
pub trait Axis: Send + Sync {
    /// Move relative to the current position, waiting for motion to
    /// complete.
    async fn move_relative(&mut self, distance_mm: f64) -> Result<()>;

    /// Home the axis (find the reference position), waiting for the
    /// homing sequence to complete.
    async fn home(&mut self) -> Result<()>;

    /// Read the current position in millimeters.
    ///
    /// This is the authoritative post-motion position and may differ
    /// from the commanded target.
    async fn position(&self) -> Result<f64>;

    /// Set the velocity limit in mm/s.
    async fn set_velocity(&mut self, mm_per_sec: f64) -> Result<()>;
}
