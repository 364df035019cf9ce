use gesture_collector_core::SessionLabels;

/// Commands sent from the console to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Open a new recording session.
    StartSession {
        /// Labels for the new session.
        labels: SessionLabels,
    },
    /// Close the open recording session.
    StopSession,
    /// Refresh and print the session list.
    List,
    /// Toggle selection of one listed session.
    Select {
        /// Zero-based position in the last printed list.
        index: usize,
    },
    /// Select everything, or clear when everything is already selected.
    SelectAll,
    /// Delete the selected sessions.
    Delete,
    /// Delete every session under the data root.
    DeleteAll,
    /// Send the selected sessions (all when none are selected) to the
    /// companion device.
    Export,
    /// Print recorder and transfer status.
    Status,
    /// Print the command reference.
    Help,
    /// Request application shutdown.
    Shutdown,
}
