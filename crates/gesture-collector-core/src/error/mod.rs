use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording, catalog and transfer errors with source location tracking.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// The data root, a session directory or a temp artifact could not be
    /// created, read or written.
    #[error("Storage unavailable at {path:?}: {source} {location}")]
    StorageUnavailable {
        /// Path the failed operation targeted.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Device motion cannot be enabled on this host.
    #[error("Motion sensing unavailable {location}")]
    SensorUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Sampling rate is zero, negative or not finite.
    #[error("Invalid sampling rate: {rate_hz} Hz {location}")]
    InvalidRate {
        /// The rejected rate.
        rate_hz: f64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session with the same name already exists on disk.
    #[error("Session already exists: {name} {location}")]
    SessionNameCollision {
        /// The colliding session name.
        name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A hand, gesture or force label could not be parsed.
    #[error("Invalid {kind} label: {value:?} {location}")]
    InvalidLabel {
        /// Which label family was being parsed.
        kind: &'static str,
        /// The offending input.
        value: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The companion device is not reachable.
    #[error("Peer device unreachable {location}")]
    PeerUnreachable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An export is already being sent.
    #[error("A transfer is already in flight {location}")]
    TransferInFlight {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Export was requested with no sessions selected.
    #[error("No sessions to export {location}")]
    NothingToExport {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The peer link refused the handoff.
    #[error("Transfer failed: {reason} {location}")]
    TransferFailure {
        /// Description reported by the peer link.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CollectorError`].
pub type Result<T> = std::result::Result<T, CollectorError>;
