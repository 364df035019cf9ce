use crate::{
    CollectorError, CoreResult,
    catalog::CatalogEntry,
    transfer::{
        ENTRY_DELIMITER, PeerLink, TransferCompletion, TransferHandle, TransferMetadata,
        payload::write_payload,
    },
};

use std::{
    fs, mem,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Observable export state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    /// Ready to export.
    Idle {
        /// Outcome of the last export, for display.
        message: Option<String>,
    },
    /// A payload is with the peer link; further exports are rejected.
    Sending,
}

impl TransferStatus {
    /// Whether an export is in flight.
    pub fn is_sending(&self) -> bool {
        matches!(self, Self::Sending)
    }

    /// Message from the last finished export, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle { message } => message.as_deref(),
            Self::Sending => None,
        }
    }
}

enum Phase {
    Idle,
    /// Payload is being built or handed over; the handle is not known yet.
    HandingOff,
    Sending {
        handle: TransferHandle,
        artifact: PathBuf,
    },
}

struct TransferState {
    phase: Phase,
    /// Completions reported before `transfer_file` returned their handle.
    early: Vec<TransferCompletion>,
}

/// Merges selected sessions into one payload and hands it to the peer link.
///
/// At most one transfer is in flight. The merged artifact lives in the temp
/// directory until its completion arrives and is then deleted.
pub struct TransferCoordinator {
    link: Arc<dyn PeerLink>,
    temp_dir: PathBuf,
    state: Mutex<TransferState>,
    status_tx: watch::Sender<TransferStatus>,
}

impl TransferCoordinator {
    /// Creates a coordinator writing artifacts into `temp_dir`.
    pub fn new(link: Arc<dyn PeerLink>, temp_dir: impl Into<PathBuf>) -> Self {
        let (status_tx, _) = watch::channel(TransferStatus::Idle { message: None });

        Self {
            link,
            temp_dir: temp_dir.into(),
            state: Mutex::new(TransferState {
                phase: Phase::Idle,
                early: Vec::new(),
            }),
            status_tx,
        }
    }

    /// Current export state.
    pub fn status(&self) -> TransferStatus {
        self.status_tx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TransferStatus> {
        self.status_tx.subscribe()
    }

    /// Sends `entries` (in the given order) to the companion device.
    ///
    /// Returns once the payload has been handed to the peer link; delivery
    /// finishes asynchronously via [`complete`](Self::complete).
    ///
    /// # Errors
    ///
    /// - `TransferInFlight` while a previous export is being sent. The
    ///   in-flight transfer is not affected.
    /// - `PeerUnreachable` when the peer is not reachable. Nothing is written.
    /// - `NothingToExport` when no entry could be read.
    /// - `StorageUnavailable` when the payload cannot be written.
    /// - `TransferFailure` when the peer link refuses the file.
    #[track_caller]
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn export(&self, entries: &[CatalogEntry]) -> CoreResult<TransferHandle> {
        {
            let mut state = self.lock_state();

            if !matches!(state.phase, Phase::Idle) {
                return Err(CollectorError::TransferInFlight {
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if !self.link.is_reachable() {
                warn!("Export requested while peer is unreachable");
                return Err(CollectorError::PeerUnreachable {
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if entries.is_empty() {
                return Err(CollectorError::NothingToExport {
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            state.phase = Phase::HandingOff;
            state.early.clear();
        }
        self.status_tx.send_replace(TransferStatus::Sending);

        let artifact = self.temp_dir.join(format!("merged_{}.txt", Uuid::new_v4()));

        let payload = match write_payload(entries, &artifact) {
            Ok(payload) => payload,
            Err(e) => {
                self.abort(&artifact, format!("Export failed: {}", e));
                return Err(CollectorError::StorageUnavailable {
                    path: artifact,
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if payload.sessions.is_empty() {
            self.abort(&artifact, "No sessions to export".to_string());
            return Err(CollectorError::NothingToExport {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let metadata = TransferMetadata {
            sessions: payload.sessions,
            delimiter: ENTRY_DELIMITER.to_string(),
        };

        let handle = match self.link.transfer_file(&artifact, metadata) {
            Ok(handle) => handle,
            Err(e) => {
                let reason = e.to_string();
                self.abort(&artifact, format!("Export failed: {}", reason));
                return Err(CollectorError::TransferFailure {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let early = {
            let mut state = self.lock_state();
            state.phase = Phase::Sending {
                handle,
                artifact: artifact.clone(),
            };
            let early = state.early.iter().position(|c| c.handle == handle);
            early.map(|i| state.early.swap_remove(i))
        };

        info!(
            handle = %handle,
            artifact = ?artifact,
            bytes = payload.bytes,
            skipped = payload.skipped.len(),
            "Payload handed to peer link"
        );

        if let Some(completion) = early {
            self.complete(completion);
        }

        Ok(handle)
    }

    /// Applies a completion reported by the peer link.
    ///
    /// Moves status back to Idle with a result message and deletes the
    /// artifact. Completions for unknown handles are ignored.
    #[instrument(skip(self))]
    pub fn complete(&self, completion: TransferCompletion) {
        let artifact = {
            let mut state = self.lock_state();
            match mem::replace(&mut state.phase, Phase::Idle) {
                Phase::Sending { handle, artifact } if handle == completion.handle => artifact,
                Phase::HandingOff => {
                    debug!(handle = %completion.handle, "Completion arrived before handoff returned");
                    state.phase = Phase::HandingOff;
                    state.early.push(completion);
                    return;
                }
                other => {
                    warn!(handle = %completion.handle, "Ignoring completion for unknown transfer");
                    state.phase = other;
                    return;
                }
            }
        };

        remove_artifact(&artifact);

        let message = match &completion.error {
            None => {
                info!(handle = %completion.handle, "Transfer complete");
                "Transfer complete".to_string()
            }
            Some(reason) => {
                warn!(handle = %completion.handle, reason = %reason, "Transfer failed");
                format!("Transfer failed: {}", reason)
            }
        };

        self.status_tx.send_replace(TransferStatus::Idle {
            message: Some(message),
        });
    }

    /// Applies completions from `rx` until every sender is dropped.
    pub async fn run_completions(&self, mut rx: mpsc::UnboundedReceiver<TransferCompletion>) {
        while let Some(completion) = rx.recv().await {
            self.complete(completion);
        }
        debug!("Completion channel closed");
    }

    fn abort(&self, artifact: &Path, message: String) {
        remove_artifact(artifact);
        self.lock_state().phase = Phase::Idle;
        self.status_tx.send_replace(TransferStatus::Idle {
            message: Some(message),
        });
    }

    fn lock_state(&self) -> MutexGuard<'_, TransferState> {
        self.state.lock().unwrap_or_else(|e| {
            error!("Transfer state lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

fn remove_artifact(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = ?path, "Artifact removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = ?path, error = %e, "Failed to remove artifact"),
    }
}
