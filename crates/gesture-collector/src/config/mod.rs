#[allow(clippy::module_inception)]
mod config;
mod labels_config;
mod sampling_config;
mod storage_config;
mod transfer_config;

pub(crate) use {
    config::Config,
    labels_config::LabelsConfig,
    sampling_config::SamplingConfig,
    storage_config::StorageConfig,
    transfer_config::TransferConfig,
};

pub(crate) const DEFAULT_RATE_HZ: f64 = gesture_collector_core::DEFAULT_SAMPLE_RATE_HZ;
pub(crate) const MAX_RATE_HZ: f64 = 1000.0;

pub(crate) fn default_rate_hz() -> f64 {
    DEFAULT_RATE_HZ
}
