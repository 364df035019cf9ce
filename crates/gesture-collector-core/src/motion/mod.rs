mod provider;
mod reading;
mod source;
mod synthetic;

pub use {
    provider::{MotionHandler, MotionProvider, SensorAvailability},
    reading::{MotionReading, STANDARD_GRAVITY, Sample, Vector3},
    source::{DEFAULT_SAMPLE_RATE_HZ, SampleSource},
    synthetic::SyntheticMotion,
};
