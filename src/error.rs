//! Custom error types for the application.
//!
//! This module defines the primary error type, `ScanError`, following the
//! taxonomy of the scan controller: region validation problems are caught
//! before any motion occurs, device-layer faults are fatal to the current
//! scan, and telemetry/persistence failures never appear here at all —
//! they are logged and swallowed at their call site by the controller.

use crate::hardware::AxisId;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Scan-fatal errors.
///
/// Device-layer faults carry the axis they occurred on plus the underlying
/// driver error as a source.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Region validation failed before any motion was commanded.
    #[error("invalid scan region: {0}")]
    InvalidRegion(String),

    /// A motion command (relative move or home) failed.
    #[error("motion fault on {axis} axis: {source}")]
    MotionFault {
        /// Axis the command was issued to.
        axis: AxisId,
        /// Underlying driver error.
        #[source]
        source: anyhow::Error,
    },

    /// A position readback failed after motion completed.
    #[error("position read fault on {axis} axis: {source}")]
    ReadFault {
        /// Axis the readback was issued to.
        axis: AxisId,
        /// Underlying driver error.
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_error_display() {
        let err = ScanError::MotionFault {
            axis: AxisId::Y,
            source: anyhow!("drive fault"),
        };
        assert_eq!(err.to_string(), "motion fault on Y axis: drive fault");
    }

    #[test]
    fn test_invalid_region_display() {
        let err = ScanError::InvalidRegion("step_size must be positive".into());
        assert!(err.to_string().contains("invalid scan region"));
    }
}
