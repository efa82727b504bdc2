//! Mock hardware implementations.
//!
//! Provides a simulated stage axis for testing and for running the scan
//! without physical hardware. All delays use `tokio::time::sleep`, never
//! `std::thread::sleep`.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::{sleep, Duration};

use crate::hardware::Axis;

/// Simulated single-axis stage.
///
/// Motion takes `distance / velocity` of wall-clock time, like the real
/// stage it stands in for. Position readback can carry a configurable
/// encoder jitter so readings differ from commanded targets the way a
/// physical encoder's readings do. Fault injection knobs let tests
/// provoke motion and readback failures at a chosen command count.
///
/// # Example
///
/// ```rust,ignore
/// let mut axis = MockAxis::new();
/// axis.move_relative(10.0).await?; // ~1 second at the default 10 mm/s
/// assert!((axis.position().await? - 10.0).abs() < 1e-9);
/// ```
pub struct MockAxis {
    position_mm: f64,
    velocity_mm_per_sec: f64,
    jitter_mm: f64,
    moves_issued: u32,
    reads_issued: AtomicU32,
    fail_moves_after: Option<u32>,
    fail_reads_after: Option<u32>,
}

impl MockAxis {
    /// Create a mock axis at position 0.0 mm with a 10 mm/s velocity limit.
    pub fn new() -> Self {
        Self {
            position_mm: 0.0,
            velocity_mm_per_sec: 10.0,
            jitter_mm: 0.0,
            moves_issued: 0,
            reads_issued: AtomicU32::new(0),
            fail_moves_after: None,
            fail_reads_after: None,
        }
    }

    /// Set the simulated velocity limit. Tests use a very large value to
    /// make motion effectively instantaneous.
    pub fn with_velocity(mut self, mm_per_sec: f64) -> Self {
        self.velocity_mm_per_sec = mm_per_sec;
        self
    }

    /// Add uniform encoder jitter of up to `±mm` to position readback.
    pub fn with_jitter(mut self, mm: f64) -> Self {
        self.jitter_mm = mm;
        self
    }

    /// Let the first `n` motion commands (moves and homes) succeed, then
    /// fail every one after.
    pub fn fail_moves_after(mut self, n: u32) -> Self {
        self.fail_moves_after = Some(n);
        self
    }

    /// Let the first `n` position reads succeed, then fail every one after.
    pub fn fail_reads_after(mut self, n: u32) -> Self {
        self.fail_reads_after = Some(n);
        self
    }

    async fn settle(&self, distance_mm: f64) {
        let seconds = distance_mm.abs() / self.velocity_mm_per_sec;
        let delay = Duration::from_secs_f64(seconds.min(60.0));
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    fn check_motion_fault(&mut self) -> Result<()> {
        self.moves_issued += 1;
        if let Some(limit) = self.fail_moves_after {
            if self.moves_issued > limit {
                bail!("simulated drive fault on motion command {}", self.moves_issued);
            }
        }
        Ok(())
    }
}

impl Default for MockAxis {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Axis for MockAxis {
    async fn move_relative(&mut self, distance_mm: f64) -> Result<()> {
        self.check_motion_fault()?;
        log::trace!(
            "mock axis moving {:+.2} mm from {:.2} mm",
            distance_mm,
            self.position_mm
        );
        self.settle(distance_mm).await;
        self.position_mm += distance_mm;
        Ok(())
    }

    async fn home(&mut self) -> Result<()> {
        self.check_motion_fault()?;
        log::trace!("mock axis homing from {:.2} mm", self.position_mm);
        self.settle(self.position_mm).await;
        self.position_mm = 0.0;
        Ok(())
    }

    async fn position(&self) -> Result<f64> {
        let read = self.reads_issued.fetch_add(1, Ordering::Relaxed);
        if let Some(limit) = self.fail_reads_after {
            if read >= limit {
                return Err(anyhow!("simulated encoder read fault"));
            }
        }
        if self.jitter_mm > 0.0 {
            let noise = rand::thread_rng().gen_range(-self.jitter_mm..=self.jitter_mm);
            return Ok(self.position_mm + noise);
        }
        Ok(self.position_mm)
    }

    async fn set_velocity(&mut self, mm_per_sec: f64) -> Result<()> {
        if !(mm_per_sec.is_finite() && mm_per_sec > 0.0) {
            bail!("velocity limit must be positive, got {mm_per_sec}");
        }
        self.velocity_mm_per_sec = mm_per_sec;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_relative_motion_and_homing() {
        let mut axis = MockAxis::new().with_velocity(1e9);
        axis.move_relative(10.0).await.unwrap();
        axis.move_relative(-2.5).await.unwrap();
        assert!((axis.position().await.unwrap() - 7.5).abs() < 1e-9);
        axis.home().await.unwrap();
        assert_eq!(axis.position().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn motion_faults_after_threshold() {
        let mut axis = MockAxis::new().with_velocity(1e9).fail_moves_after(2);
        axis.move_relative(1.0).await.unwrap();
        axis.home().await.unwrap();
        assert!(axis.move_relative(1.0).await.is_err());
    }

    #[tokio::test]
    async fn rejects_bad_velocity() {
        let mut axis = MockAxis::new();
        assert!(axis.set_velocity(0.0).await.is_err());
        assert!(axis.set_velocity(f64::NAN).await.is_err());
        assert!(axis.set_velocity(5.0).await.is_ok());
    }

    #[tokio::test]
    async fn jitter_stays_bounded() {
        let mut axis = MockAxis::new().with_velocity(1e9).with_jitter(0.05);
        axis.move_relative(10.0).await.unwrap();
        for _ in 0..32 {
            let pos = axis.position().await.unwrap();
            assert!((pos - 10.0).abs() <= 0.05 + 1e-12);
        }
    }
}
