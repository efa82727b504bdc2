//! Raster scan binary.
//!
//! Wires the scan controller to a pair of simulated stage axes, a
//! logging progress sink, a per-point text record store, and an operator
//! channel reading stdin. The process exit status distinguishes the
//! three scan outcomes.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use stage_scan::control::ControlSignal;
use stage_scan::controller::{ScanController, ScanOutcome};
use stage_scan::hardware::mock::MockAxis;
use stage_scan::hardware::Axis;
use stage_scan::operator::OperatorChannel;
use stage_scan::progress::LogProgress;
use stage_scan::region::ScanRegion;
use stage_scan::storage::TextRecordStore;

/// Raster scan controller for a two-axis motorized stage.
#[derive(Parser, Debug)]
#[command(name = "stage_scan", version, about)]
struct Cli {
    /// Scan extent along X in millimeters.
    #[arg(long, default_value_t = 150.0)]
    length_x: f64,

    /// Scan extent along Y in millimeters.
    #[arg(long, default_value_t = 150.0)]
    length_y: f64,

    /// Grid step in millimeters.
    #[arg(long, default_value_t = 10.0)]
    step_size: f64,

    /// Delay between grid points in seconds (live progress cadence).
    #[arg(long, default_value_t = 5.0)]
    period: f64,

    /// Directory receiving one record file per grid point.
    #[arg(long, default_value = "scan_data")]
    data_dir: PathBuf,

    /// Velocity limit applied to both axes in mm/s.
    #[arg(long, default_value_t = 1.0)]
    max_speed: f64,
}

/// Bring an axis to a known state before scanning: clamp its velocity
/// and home it.
async fn setup_axis(axis: &mut dyn Axis, max_speed: f64) -> anyhow::Result<()> {
    axis.set_velocity(max_speed).await?;
    axis.home().await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let region = ScanRegion::new(cli.length_x, cli.length_y, cli.step_size);

    let store = match TextRecordStore::create(&cli.data_dir) {
        Ok(store) => store,
        Err(err) => {
            log::error!("{err:#}");
            std::process::exit(1);
        }
    };

    let mut axis_x = MockAxis::new().with_jitter(0.01);
    let mut axis_y = MockAxis::new().with_jitter(0.01);
    if let Err(err) = setup_axis(&mut axis_x, cli.max_speed).await {
        log::error!("X axis setup failed: {err:#}");
        std::process::exit(1);
    }
    if let Err(err) = setup_axis(&mut axis_y, cli.max_speed).await {
        log::error!("Y axis setup failed: {err:#}");
        std::process::exit(1);
    }

    let signal = ControlSignal::new();
    let watch = signal.watch();
    println!("Type 'p' to pause, 'r' to resume, or 'q' to quit.");
    let listener = tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        OperatorChannel::new(signal).run(stdin).await;
    });

    let period = if cli.period.is_finite() && cli.period > 0.0 {
        Duration::from_secs_f64(cli.period)
    } else {
        Duration::ZERO
    };
    let controller = ScanController::new(
        Box::new(axis_x),
        Box::new(axis_y),
        Box::new(LogProgress::new(region.num_points())),
        Box::new(store),
        watch,
    )
    .with_period(period);

    let run = controller.run(region).await;
    listener.abort();

    // A stdin read still in flight would otherwise hold the runtime open,
    // so exit explicitly once telemetry is flushed.
    let code = match &run.outcome {
        ScanOutcome::Completed => {
            log::info!(
                "{} ({} points, {} persist failures)",
                run.outcome,
                run.points.len(),
                run.skipped_persists
            );
            0
        }
        ScanOutcome::Aborted => {
            log::info!(
                "{} after {} points; exiting cleanly",
                run.outcome,
                run.points.len()
            );
            2
        }
        ScanOutcome::Failed(_) => {
            log::error!("{} after {} points", run.outcome, run.points.len());
            1
        }
    };
    std::process::exit(code);
}
