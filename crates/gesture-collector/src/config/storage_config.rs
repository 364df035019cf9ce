use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where sessions, transfer artifacts and logs live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per recorded session.
    pub data_root: PathBuf,

    /// Directory for merged transfer artifacts.
    #[serde(default = "std::env::temp_dir")]
    pub temp_dir: PathBuf,

    /// Directory for rolling log files.
    pub log_dir: PathBuf,
}
