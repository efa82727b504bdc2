//! Scan region geometry.

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};

/// Rectangular scan region and grid pitch, immutable for one scan.
///
/// The grid has `steps_x() * steps_y()` points; both counts derive from
/// `round(length / step_size)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanRegion {
    /// Scan extent along X in millimeters.
    pub length_x_mm: f64,
    /// Scan extent along Y in millimeters.
    pub length_y_mm: f64,
    /// Grid pitch in millimeters.
    pub step_size_mm: f64,
}

impl ScanRegion {
    /// Create a region from extents and pitch, all in millimeters.
    pub fn new(length_x_mm: f64, length_y_mm: f64, step_size_mm: f64) -> Self {
        Self {
            length_x_mm,
            length_y_mm,
            step_size_mm,
        }
    }

    /// Check that the region describes a traversable grid.
    ///
    /// All values must be finite and positive, and the pitch must fit
    /// within both extents.
    pub fn validate(&self) -> ScanResult<()> {
        for (name, value) in [
            ("length_x", self.length_x_mm),
            ("length_y", self.length_y_mm),
            ("step_size", self.step_size_mm),
        ] {
            if !value.is_finite() {
                return Err(ScanError::InvalidRegion(format!(
                    "{name} must be finite, got {value}"
                )));
            }
            if value <= 0.0 {
                return Err(ScanError::InvalidRegion(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.step_size_mm > self.length_x_mm {
            return Err(ScanError::InvalidRegion(format!(
                "step_size {} mm exceeds length_x {} mm",
                self.step_size_mm, self.length_x_mm
            )));
        }
        if self.step_size_mm > self.length_y_mm {
            return Err(ScanError::InvalidRegion(format!(
                "step_size {} mm exceeds length_y {} mm",
                self.step_size_mm, self.length_y_mm
            )));
        }
        Ok(())
    }

    /// Number of grid columns (X rows of the raster).
    pub fn steps_x(&self) -> usize {
        (self.length_x_mm / self.step_size_mm).round() as usize
    }

    /// Number of grid points per column.
    pub fn steps_y(&self) -> usize {
        (self.length_y_mm / self.step_size_mm).round() as usize
    }

    /// Total number of grid points in a full traversal.
    pub fn num_points(&self) -> usize {
        self.steps_x() * self.steps_y()
    }
}
