use crate::{CoreResult, motion::MotionReading};

use std::time::Duration;

/// Callback invoked once per motion update.
///
/// Providers must never invoke it concurrently with itself.
pub type MotionHandler = Box<dyn FnMut(MotionReading) + Send + 'static>;

/// Which motion capabilities the platform currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorAvailability {
    /// Raw accelerometer present.
    pub accelerometer: bool,
    /// Gyroscope present.
    pub gyroscope: bool,
    /// Fused device-motion updates (gravity, user acceleration, rotation).
    pub device_motion: bool,
}

impl SensorAvailability {
    /// All capabilities present.
    pub const ALL: Self = Self {
        accelerometer: true,
        gyroscope: true,
        device_motion: true,
    };

    /// No capabilities present.
    pub const NONE: Self = Self {
        accelerometer: false,
        gyroscope: false,
        device_motion: false,
    };
}

/// Platform motion sensing API.
pub trait MotionProvider: Send {
    /// Capabilities currently available.
    fn availability(&self) -> SensorAvailability;

    /// Sets the interval between device-motion updates.
    fn set_update_interval(&mut self, interval: Duration);

    /// Begins delivering updates to `handler` at the configured interval.
    fn start_updates(&mut self, handler: MotionHandler) -> CoreResult<()>;

    /// Stops delivering updates. After this returns the handler is dropped
    /// and will not be invoked again.
    fn stop_updates(&mut self);
}
