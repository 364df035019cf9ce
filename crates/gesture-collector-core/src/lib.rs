//! Gesture Collector Core Library
//!
//! Motion-session recording and transfer pipeline: samples device motion at
//! a fixed rate, writes labelled sessions to disk, catalogs them by naming
//! convention, and ships selected sessions to a companion device.
//!
//! # Example
//!
//! ```no_run
//! use gesture_collector_core::{
//!     CoreResult, Force, Gesture, Hand, SessionCatalog, SessionLabels, SessionRecorder,
//!     SyntheticMotion,
//! };
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut recorder = SessionRecorder::new("sessions", SyntheticMotion::new());
//!
//!     let labels = SessionLabels::new(Hand::Right, Gesture::DoubleTap, Force::Heavy, None);
//!     recorder.start_session(labels)?;
//!     sleep(Duration::from_secs(3));
//!     recorder.stop_session();
//!
//!     for entry in SessionCatalog::new("sessions").list()? {
//!         println!("{}", entry.name());
//!     }
//!     Ok(())
//! }
//! ```

mod catalog;
mod error;
mod motion;
mod session;
mod transfer;

pub use {
    catalog::{CatalogEntry, DeleteFailure, DeleteReport, SessionCatalog, Selection},
    error::{CollectorError, Result as CoreResult},
    motion::{
        DEFAULT_SAMPLE_RATE_HZ, MotionHandler, MotionProvider, MotionReading, STANDARD_GRAVITY,
        Sample, SampleSource, SensorAvailability, SyntheticMotion, Vector3,
    },
    session::{
        Channel, Force, Gesture, Hand, LabelStyle, LiveReadout, LocalClock, RecorderStatus,
        SessionClock, SessionLabels, SessionName, SessionRecorder, SessionSummary,
        TIMESTAMP_FORMAT,
    },
    transfer::{
        ENTRY_DELIMITER, PeerLink, PeerLinkError, TransferCompletion, TransferCoordinator,
        TransferHandle, TransferMetadata, TransferStatus,
    },
};
