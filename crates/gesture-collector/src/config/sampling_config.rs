use crate::config::default_rate_hz;

use serde::{Deserialize, Serialize};

/// Motion sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Device-motion updates per second.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
        }
    }
}
