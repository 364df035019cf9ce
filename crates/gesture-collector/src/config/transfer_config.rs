use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Companion-device transfer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Directory standing in for the companion device. The peer counts as
    /// reachable while it exists.
    pub outbox_dir: PathBuf,
}
