use crate::{motion::Sample, session::SessionName};

use std::{path::PathBuf, time::Duration};

/// Observable recorder state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderStatus {
    /// No session open.
    Idle,
    /// A session is open and receiving ticks.
    Recording {
        /// Name of the open session.
        session: SessionName,
    },
}

impl RecorderStatus {
    /// Whether a session is open.
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }
}

/// What a session left on disk once it was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Session name.
    pub name: SessionName,
    /// Session directory.
    pub path: PathBuf,
    /// Data rows in each channel file (header excluded).
    pub rows: u64,
    /// Ticks dropped because they could not be written.
    pub dropped_ticks: u64,
    /// Time between start and stop.
    pub duration: Duration,
}

/// Latest converted tick of the open session, for a live readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveReadout {
    /// Gravity-compensated acceleration, m/s².
    pub acceleration: Sample,
    /// Angular rate, rad/s.
    pub rotation: Sample,
}
