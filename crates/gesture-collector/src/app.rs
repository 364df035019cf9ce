use crate::{AppCommand, AppError, AppResult, console::HELP};

use gesture_collector_core::{
    CatalogEntry, DeleteReport, MotionProvider, SessionCatalog, SessionRecorder, Selection,
    TransferCoordinator, TransferStatus,
};

use std::{fmt::Write as _, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Owns the recorder and the session list; commands arrive one at a time
/// from the console, so neither needs a lock.
pub struct App<P: MotionProvider> {
    pub(crate) recorder: SessionRecorder<P>,
    pub(crate) catalog: SessionCatalog,
    pub(crate) transfer: Arc<TransferCoordinator>,
    pub(crate) selection: Selection,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<P: MotionProvider> App<P> {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Gesture collector starting");

        let mut transfer_rx = self.transfer.subscribe();

        if !self.recorder.is_ready() {
            warn!("Device motion is unavailable, sessions cannot be started");
            println!("Device motion is unavailable; recording is disabled.");
        }
        print_reply(self.handle_command(AppCommand::List));

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }
                    print_reply(self.handle_command(cmd));
                }

                Ok(()) = transfer_rx.changed() => {
                    let status = transfer_rx.borrow_and_update().clone();
                    if let TransferStatus::Idle { message: Some(message) } = status {
                        println!("{}", message);
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        if let Some(summary) = self.recorder.stop_session() {
            println!(
                "Saved {} ({} rows) before exit",
                summary.name, summary.rows
            );
        }

        let _ = self.shutdown_tx.send(true);
        info!("Gesture collector shut down");

        Ok(())
    }

    /// Apply one command and return the text to show the user.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, command: AppCommand) -> AppResult<String> {
        match command {
            AppCommand::StartSession { labels } => {
                let name = self.recorder.start_session(labels)?;
                Ok(format!("Recording {}", name))
            }
            AppCommand::StopSession => match self.recorder.stop_session() {
                Some(summary) => {
                    self.refresh()?;
                    let mut reply = format!(
                        "Saved {}: {} rows in {:.1}s",
                        summary.name,
                        summary.rows,
                        summary.duration.as_secs_f64()
                    );
                    if summary.dropped_ticks > 0 {
                        let _ = write!(reply, " ({} ticks dropped)", summary.dropped_ticks);
                    }
                    Ok(reply)
                }
                None => Ok("No session is recording".to_string()),
            },
            AppCommand::List => {
                self.refresh()?;
                Ok(self.render_list())
            }
            AppCommand::Select { index } => match self.selection.toggle(index) {
                Some(_) => Ok(self.render_list()),
                None => Err(AppError::InvalidCommand {
                    reason: format!("No session #{}", index + 1),
                    location: ErrorLocation::from(Location::caller()),
                }),
            },
            AppCommand::SelectAll => {
                self.selection.toggle_all();
                Ok(self.render_list())
            }
            AppCommand::Delete => {
                let targets = self.without_open_session(self.selection.selected());
                if targets.is_empty() {
                    return Ok("Nothing selected".to_string());
                }
                let report = self.catalog.delete(&targets);
                self.refresh()?;
                Ok(render_report(&report))
            }
            AppCommand::DeleteAll => {
                let targets = self.without_open_session(self.catalog.list()?);
                let report = self.catalog.delete(&targets);
                self.refresh()?;
                Ok(render_report(&report))
            }
            AppCommand::Export => {
                let mut targets = self.selection.selected();
                if targets.is_empty() {
                    targets = self.selection.entries().cloned().collect();
                }
                let targets = self.without_open_session(targets);
                let handle = self.transfer.export(&targets)?;
                info!(handle = %handle, sessions = targets.len(), "Export handed off");
                self.selection.clear();
                Ok(format!("Sending {} session(s)", targets.len()))
            }
            AppCommand::Status => Ok(self.render_status()),
            AppCommand::Help => Ok(HELP.to_string()),
            AppCommand::Shutdown => Ok(String::new()),
        }
    }

    /// Rebuild the selection from a fresh listing. Checked flags reset.
    fn refresh(&mut self) -> AppResult<()> {
        self.selection = Selection::new(self.catalog.list()?);
        Ok(())
    }

    /// Drops the session being written, if it is among `entries`.
    fn without_open_session(&self, mut entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        if let Some(open) = self.recorder.current_session() {
            let before = entries.len();
            entries.retain(|entry| entry.name() != open.as_str());
            if entries.len() != before {
                warn!(session = %open, "Skipping session that is still recording");
            }
        }
        entries
    }

    fn render_list(&self) -> String {
        if self.selection.is_empty() {
            return "No sessions".to_string();
        }

        let mut out = String::new();
        for (i, entry) in self.selection.entries().enumerate() {
            let mark = if self.selection.is_selected(i) { 'x' } else { ' ' };
            let _ = writeln!(out, "[{}] {:>3}  {}", mark, i + 1, entry.name());
        }
        let selected = self.selection.selected().len();
        let _ = write!(out, "{} session(s), {} selected", self.selection.len(), selected);
        out
    }

    fn render_status(&self) -> String {
        let recorder = match self.recorder.current_session() {
            Some(name) => format!("recording {}", name),
            None if self.recorder.is_ready() => "idle".to_string(),
            None => "unavailable (no device motion)".to_string(),
        };
        let transfer = match self.transfer.status() {
            TransferStatus::Sending => "sending".to_string(),
            TransferStatus::Idle { message: Some(m) } => format!("idle ({})", m),
            TransferStatus::Idle { message: None } => "idle".to_string(),
        };
        let sensors = self.recorder.availability();
        let mut out = format!(
            "Recorder: {}\nSensors: accelerometer {}, gyroscope {}, device motion {}",
            recorder,
            yes_no(sensors.accelerometer),
            yes_no(sensors.gyroscope),
            yes_no(sensors.device_motion)
        );
        if let Some(live) = self.recorder.latest_reading() {
            let (a, g) = (live.acceleration, live.rotation);
            let _ = write!(
                out,
                "\nAcceleration: {:.3} {:.3} {:.3} m/s²\nRotation: {:.3} {:.3} {:.3} rad/s",
                a.x, a.y, a.z, g.x, g.y, g.z
            );
        }
        let _ = write!(
            out,
            "\nTransfer: {}\nData root: {}",
            transfer,
            self.recorder.data_root().display()
        );
        out
    }
}

fn yes_no(present: bool) -> &'static str {
    if present { "yes" } else { "no" }
}

fn render_report(report: &DeleteReport) -> String {
    let mut out = format!("Deleted {} session(s)", report.removed.len());
    for failure in &report.failed {
        let _ = write!(out, "\nCould not delete {}: {}", failure.name, failure.reason);
    }
    out
}

fn print_reply(reply: AppResult<String>) {
    match reply {
        Ok(text) if text.is_empty() => {}
        Ok(text) => println!("{}", text),
        Err(AppError::InvalidCommand { reason, .. }) => println!("{}", reason),
        Err(AppError::Core { source, .. }) => {
            error!(error = ?source, "Command failed");
            println!("Error: {}", source);
        }
        Err(e) => {
            error!(error = ?e, "Command failed");
            println!("Error: {}", e);
        }
    }
}
