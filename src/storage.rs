//! Per-point record persistence.
//!
//! Each visited grid point becomes one durable record. Like progress
//! emission, persistence is never fatal to motion sequencing: the
//! controller logs a store failure, counts the point as a skipped
//! persist, and keeps scanning.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::point::GridPoint;

/// Durable store for sampled grid points.
#[async_trait]
pub trait RecordStore: Send {
    /// Persist one grid point.
    async fn persist(&mut self, point: &GridPoint) -> Result<()>;
}

/// Record store writing one human-readable text file per point.
///
/// Files land in the data directory and are named by position and
/// timestamp, e.g. `20.00_10.00_14-03-22.418_06_08_2026.txt`, so record
/// names stay collision-free. Each file holds a position line and a
/// timestamp line.
pub struct TextRecordStore {
    dir: PathBuf,
}

impl TextRecordStore {
    /// Create the data directory (if needed) and a store writing into it.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory at {}", dir.display()))?;
        log::info!("record store writing to '{}'", dir.display());
        Ok(Self { dir })
    }

    fn record_path(&self, point: &GridPoint) -> PathBuf {
        let file_name = format!(
            "{:.2}_{:.2}_{}_{}.txt",
            point.position_x_mm,
            point.position_y_mm,
            point.timestamp.format("%H-%M-%S%.3f"),
            point.timestamp.format("%d_%m_%Y"),
        );
        self.dir.join(file_name)
    }
}

#[async_trait]
impl RecordStore for TextRecordStore {
    async fn persist(&mut self, point: &GridPoint) -> Result<()> {
        let path = self.record_path(point);
        let body = format!(
            "Position: X={:.2} mm, Y={:.2} mm\nTimestamp: {}\n",
            point.position_x_mm,
            point.position_y_mm,
            point.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("failed to write record at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_point() -> GridPoint {
        GridPoint {
            index_x: 1,
            index_y: 2,
            position_x_mm: 20.0,
            position_y_mm: 10.5,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn writes_one_record_per_point() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TextRecordStore::create(dir.path()).unwrap();

        store.persist(&sample_point()).await.unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let path = entries[0].as_ref().unwrap().path();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("Position: X=20.00 mm, Y=10.50 mm"));
        assert!(body.contains("Timestamp: "));

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("20.00_10.50_"));
        assert!(name.ends_with(".txt"));
    }

    #[tokio::test]
    async fn creates_missing_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("scan_data");
        let mut store = TextRecordStore::create(&nested).unwrap();
        store.persist(&sample_point()).await.unwrap();
        assert!(nested.exists());
    }
}
