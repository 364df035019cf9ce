use crate::{
    CollectorError, CoreResult,
    motion::{MotionHandler, MotionProvider, MotionReading, SensorAvailability, Vector3},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Motion provider for hosts without motion hardware.
///
/// Ticks on a dedicated thread at the configured interval and produces a
/// slow wrist-roll waveform: gravity rotating around the X axis, a small
/// oscillating user acceleration, and the matching rotation rate.
pub struct SyntheticMotion {
    origin: Instant,
    interval: Duration,
    worker: Option<JoinHandle<()>>,
    /// Checked by the worker before each tick. Set before joining so the
    /// handler is never invoked after `stop_updates` returns.
    shutdown: Arc<AtomicBool>,
}

impl SyntheticMotion {
    /// Angular frequency of the simulated wrist roll, in rad/s.
    const ROLL_RATE: f64 = 0.8;

    /// Creates an idle provider ticking at 100 Hz once started.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            interval: Duration::from_millis(10),
            worker: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    fn reading_at(seconds: f64) -> MotionReading {
        let angle = seconds * Self::ROLL_RATE;
        let wobble = (seconds * 7.0).sin() * 0.05;

        MotionReading {
            timestamp: seconds,
            gravity: Vector3::new(0.0, -angle.sin(), -angle.cos()),
            user_acceleration: Vector3::new(wobble, wobble * 0.5, -wobble),
            rotation_rate: Vector3::new(Self::ROLL_RATE, 0.35 * (seconds * 7.0).cos(), 0.0),
        }
    }
}

impl Default for SyntheticMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionProvider for SyntheticMotion {
    fn availability(&self) -> SensorAvailability {
        SensorAvailability::ALL
    }

    fn set_update_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    #[track_caller]
    #[instrument(skip(self, handler))]
    fn start_updates(&mut self, mut handler: MotionHandler) -> CoreResult<()> {
        self.stop_updates();
        self.shutdown.store(false, Ordering::Release);

        let shutdown = Arc::clone(&self.shutdown);
        let origin = self.origin;
        let interval = self.interval;

        let worker = std::thread::Builder::new()
            .name("synthetic-motion".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + interval;
                while !shutdown.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < next_tick {
                        std::thread::sleep(next_tick - now);
                        continue;
                    }
                    handler(Self::reading_at(origin.elapsed().as_secs_f64()));
                    next_tick += interval;
                }
            })
            .map_err(|e| {
                error!(error = %e, "Failed to spawn synthetic motion thread");
                CollectorError::SensorUnavailable {
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        self.worker = Some(worker);
        info!(interval_us = interval.as_micros(), "Synthetic motion started");

        Ok(())
    }

    fn stop_updates(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Synthetic motion thread panicked");
            }
            debug!("Synthetic motion stopped");
        }
    }
}

impl Drop for SyntheticMotion {
    fn drop(&mut self) {
        self.stop_updates();
    }
}
