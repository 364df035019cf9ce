use crate::{
    CollectorError, CoreResult,
    motion::{MotionProvider, MotionReading, SensorAvailability},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Default sampling rate in Hz.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 100.0;

/// Fixed-rate sample delivery over a platform [`MotionProvider`].
pub struct SampleSource<P: MotionProvider> {
    provider: P,
    running: bool,
}

impl<P: MotionProvider> SampleSource<P> {
    /// Wraps a provider. Logs what the platform reports as available.
    pub fn new(provider: P) -> Self {
        let availability = provider.availability();
        info!(
            accelerometer = availability.accelerometer,
            gyroscope = availability.gyroscope,
            device_motion = availability.device_motion,
            "SampleSource initialized"
        );

        Self {
            provider,
            running: false,
        }
    }

    /// Whether device motion can be enabled.
    pub fn is_ready(&self) -> bool {
        self.provider.availability().device_motion
    }

    /// Capabilities reported by the provider.
    pub fn availability(&self) -> SensorAvailability {
        self.provider.availability()
    }

    /// Whether updates are currently being delivered.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts delivering one reading per tick at `rate_hz` to `on_sample`.
    ///
    /// A source that is already running is stopped first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` for a non-positive or non-finite rate and
    /// `SensorUnavailable` when device motion cannot be enabled. In both
    /// cases no samples are delivered.
    #[track_caller]
    #[instrument(skip(self, on_sample))]
    pub fn start<F>(&mut self, rate_hz: f64, on_sample: F) -> CoreResult<()>
    where
        F: FnMut(MotionReading) + Send + 'static,
    {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(CollectorError::InvalidRate {
                rate_hz,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.stop();

        if !self.is_ready() {
            warn!("Device motion unavailable, no samples will be delivered");
            return Err(CollectorError::SensorUnavailable {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let interval = Duration::from_secs_f64(1.0 / rate_hz);
        self.provider.set_update_interval(interval);
        self.provider.start_updates(Box::new(on_sample))?;
        self.running = true;

        debug!(rate_hz, interval_us = interval.as_micros(), "Sample delivery started");

        Ok(())
    }

    /// Halts delivery. Safe to call when not running.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.provider.stop_updates();
        self.running = false;

        debug!("Sample delivery stopped");
    }
}

impl<P: MotionProvider> Drop for SampleSource<P> {
    fn drop(&mut self) {
        self.stop();
    }
}
