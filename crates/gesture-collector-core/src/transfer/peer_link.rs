use std::{fmt, path::Path};

use uuid::Uuid;

/// Error reported by a [`PeerLink`] implementation.
pub type PeerLinkError = Box<dyn std::error::Error + Send + Sync>;

/// Identifies one file handed to the peer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferHandle(Uuid);

impl TransferHandle {
    /// Fresh random handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransferHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Metadata sent alongside a merged payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMetadata {
    /// Sessions in the order their bytes appear in the payload.
    pub sessions: Vec<String>,
    /// Delimiter between consecutive sessions.
    pub delimiter: String,
}

/// Asynchronous outcome of one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCompletion {
    /// Transfer this completion belongs to.
    pub handle: TransferHandle,
    /// `None` on success.
    pub error: Option<String>,
}

/// Device-to-device link to the companion device.
///
/// Transfers are best effort. `transfer_file` only queues the file; its
/// outcome arrives later as a [`TransferCompletion`] carrying the returned
/// handle.
pub trait PeerLink: Send + Sync {
    /// Whether the companion device can currently be reached.
    fn is_reachable(&self) -> bool;

    /// Queues `path` for delivery. The file must stay in place until the
    /// completion for the returned handle has been reported.
    fn transfer_file(
        &self,
        path: &Path,
        metadata: TransferMetadata,
    ) -> Result<TransferHandle, PeerLinkError>;
}
