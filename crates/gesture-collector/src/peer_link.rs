//! Peer link that delivers merged payloads into a local outbox directory.
//!
//! Stands in for a device-to-device radio link on hosts without one: the
//! companion side picks files up from the outbox.

use gesture_collector_core::{
    PeerLink, PeerLinkError, TransferCompletion, TransferHandle, TransferMetadata,
};

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
};

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Copies each payload into `outbox` on a background thread and reports the
/// outcome on `completion_tx`.
pub struct DirectoryPeerLink {
    outbox: PathBuf,
    completion_tx: mpsc::UnboundedSender<TransferCompletion>,
}

impl DirectoryPeerLink {
    /// Create a link delivering into `outbox`.
    pub fn new(
        outbox: impl Into<PathBuf>,
        completion_tx: mpsc::UnboundedSender<TransferCompletion>,
    ) -> Self {
        Self {
            outbox: outbox.into(),
            completion_tx,
        }
    }

    /// Outbox directory.
    pub fn outbox(&self) -> &Path {
        &self.outbox
    }
}

impl PeerLink for DirectoryPeerLink {
    fn is_reachable(&self) -> bool {
        self.outbox.is_dir()
    }

    #[instrument(skip(self, metadata), fields(sessions = metadata.sessions.len()))]
    fn transfer_file(
        &self,
        path: &Path,
        metadata: TransferMetadata,
    ) -> Result<TransferHandle, PeerLinkError> {
        let handle = TransferHandle::new();
        let source = path.to_path_buf();
        let stem = self.outbox.join(format!("gesture_sessions_{}", handle));
        let completion_tx = self.completion_tx.clone();

        thread::Builder::new()
            .name("peer-link".to_string())
            .spawn(move || {
                let error = deliver(&source, &stem, &metadata)
                    .err()
                    .map(|e| e.to_string());

                match &error {
                    None => info!(handle = %handle, "Payload delivered"),
                    Some(reason) => warn!(handle = %handle, reason = %reason, "Delivery failed"),
                }

                if completion_tx
                    .send(TransferCompletion { handle, error })
                    .is_err()
                {
                    debug!(handle = %handle, "Completion receiver gone");
                }
            })?;

        debug!(handle = %handle, "Payload queued");

        Ok(handle)
    }
}

/// Writes `<stem>.txt` with the payload and `<stem>.sessions` with one
/// session name per line. Both land under a `.part` name first so the
/// receiving side never sees a partial file.
fn deliver(source: &Path, stem: &Path, metadata: &TransferMetadata) -> io::Result<()> {
    let payload = stem.with_extension("txt");
    let payload_part = stem.with_extension("txt.part");
    fs::copy(source, &payload_part)?;
    fs::rename(&payload_part, &payload)?;

    let manifest = stem.with_extension("sessions");
    let manifest_part = stem.with_extension("sessions.part");
    let mut file = fs::File::create(&manifest_part)?;
    for name in &metadata.sessions {
        writeln!(file, "{}", name)?;
    }
    file.sync_all()?;
    fs::rename(&manifest_part, &manifest)?;

    Ok(())
}
