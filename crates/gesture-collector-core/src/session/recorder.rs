use crate::{
    CollectorError, CoreResult,
    motion::{DEFAULT_SAMPLE_RATE_HZ, MotionProvider, SampleSource, SensorAvailability},
    session::{
        LabelStyle, LiveReadout, LocalClock, RecorderStatus, SessionClock, SessionLabels,
        SessionName, SessionSummary, sink::SessionSink,
    },
};

use std::{
    fs, io,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Owns the `Idle -> Recording -> Idle` session lifecycle.
///
/// Each session is a directory under the data root holding `acc.txt` and
/// `gyro.txt`. While recording, every tick appends exactly one row to both
/// files or to neither.
///
/// # Thread Safety
///
/// `start_session` and `stop_session` take `&mut self`; wrap the recorder
/// in a mutex to drive it from several tasks. Ticks arrive on the
/// provider's thread and reach the open files only through a per-session
/// lock. Stopping halts the provider before the files are closed, so a
/// late tick can never write into a closed or newer session.
///
/// Every finite tick also replaces the live readout, which is cleared again
/// when the session stops.
pub struct SessionRecorder<P: MotionProvider> {
    data_root: PathBuf,
    rate_hz: f64,
    style: LabelStyle,
    clock: Box<dyn SessionClock>,
    source: SampleSource<P>,
    active: Option<ActiveSession>,
    status_tx: watch::Sender<RecorderStatus>,
    readout_tx: Arc<watch::Sender<Option<LiveReadout>>>,
}

struct ActiveSession {
    name: SessionName,
    dir: PathBuf,
    sink: Arc<Mutex<SessionSink>>,
    started_at: Instant,
}

impl<P: MotionProvider> SessionRecorder<P> {
    /// Creates an idle recorder writing sessions under `data_root`.
    ///
    /// Samples at 100 Hz, names sessions with localized labels and the local
    /// clock until configured otherwise.
    pub fn new(data_root: impl Into<PathBuf>, provider: P) -> Self {
        let data_root = data_root.into();
        let (status_tx, _) = watch::channel(RecorderStatus::Idle);
        let (readout_tx, _) = watch::channel(None);

        info!(data_root = ?data_root, "SessionRecorder initialized");

        Self {
            data_root,
            rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            style: LabelStyle::default(),
            clock: Box::new(LocalClock),
            source: SampleSource::new(provider),
            active: None,
            status_tx,
            readout_tx: Arc::new(readout_tx),
        }
    }

    /// Sets the sampling rate used by subsequent sessions.
    pub fn with_rate_hz(mut self, rate_hz: f64) -> Self {
        self.rate_hz = rate_hz;
        self
    }

    /// Sets the label spelling used in new session names.
    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// Replaces the clock that timestamps session names.
    pub fn with_clock(mut self, clock: impl SessionClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Directory sessions are written to.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Readiness flag: whether the motion sensor can deliver samples.
    pub fn is_ready(&self) -> bool {
        self.source.is_ready()
    }

    /// Which motion sensors the device reports.
    pub fn availability(&self) -> SensorAvailability {
        self.source.availability()
    }

    /// Current recorder state.
    pub fn status(&self) -> RecorderStatus {
        self.status_tx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<RecorderStatus> {
        self.status_tx.subscribe()
    }

    /// Samples of the most recent tick while recording, `None` when Idle.
    pub fn latest_reading(&self) -> Option<LiveReadout> {
        *self.readout_tx.borrow()
    }

    /// Receiver notified on every tick and when the readout is cleared.
    pub fn subscribe_readings(&self) -> watch::Receiver<Option<LiveReadout>> {
        self.readout_tx.subscribe()
    }

    /// Name of the open session, if any.
    pub fn current_session(&self) -> Option<&SessionName> {
        self.active.as_ref().map(|a| &a.name)
    }

    /// Opens a new session and starts sampling into it.
    ///
    /// An open session is stopped first. On failure the recorder stays Idle
    /// and nothing created by this call is left on disk.
    ///
    /// # Errors
    ///
    /// `SensorUnavailable` if motion sensing cannot be enabled,
    /// `SessionNameCollision` if a session with the same name exists,
    /// `StorageUnavailable` if the directory or files cannot be created, and
    /// `InvalidRate` for an unusable sampling rate.
    #[track_caller]
    #[instrument(skip(self), fields(data_root = ?self.data_root))]
    pub fn start_session(&mut self, labels: SessionLabels) -> CoreResult<SessionName> {
        if let Some(previous) = self.stop_session() {
            debug!(session = %previous.name, "Previous session closed by new start");
        }

        if !self.source.is_ready() {
            return Err(CollectorError::SensorUnavailable {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let name = SessionName::compose(self.clock.now(), &labels, self.style);
        let dir = self.data_root.join(name.as_str());

        fs::create_dir_all(&self.data_root)
            .map_err(|e| storage_error(&self.data_root, e, Location::caller()))?;

        fs::create_dir(&dir).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                CollectorError::SessionNameCollision {
                    name: name.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            } else {
                storage_error(&dir, e, Location::caller())
            }
        })?;

        let sink = match SessionSink::create(&dir) {
            Ok(sink) => Arc::new(Mutex::new(sink)),
            Err(e) => {
                discard_dir(&dir);
                return Err(storage_error(&dir, e, Location::caller()));
            }
        };

        let tick_sink = Arc::clone(&sink);
        let readout_tx = Arc::clone(&self.readout_tx);
        let started = self.source.start(self.rate_hz, move |reading| {
            let readout = lock_sink(&tick_sink).record(&reading);
            if let Some(readout) = readout {
                readout_tx.send_replace(Some(readout));
            }
        });

        if let Err(e) = started {
            lock_sink(&sink).close();
            discard_dir(&dir);
            return Err(e);
        }

        self.active = Some(ActiveSession {
            name: name.clone(),
            dir,
            sink,
            started_at: Instant::now(),
        });
        self.status_tx.send_replace(RecorderStatus::Recording {
            session: name.clone(),
        });

        info!(session = %name, rate_hz = self.rate_hz, "Session started");

        Ok(name)
    }

    /// Stops sampling and closes the open session's files.
    ///
    /// Returns `None` when already Idle; calling it twice is harmless.
    #[instrument(skip(self))]
    pub fn stop_session(&mut self) -> Option<SessionSummary> {
        let active = self.active.take()?;

        self.source.stop();
        self.readout_tx.send_replace(None);

        let (rows, dropped_ticks) = {
            let mut sink = lock_sink(&active.sink);
            sink.close();
            (sink.rows(), sink.dropped_ticks())
        };

        self.status_tx.send_replace(RecorderStatus::Idle);

        let summary = SessionSummary {
            name: active.name,
            path: active.dir,
            rows,
            dropped_ticks,
            duration: active.started_at.elapsed(),
        };

        info!(
            session = %summary.name,
            rows = summary.rows,
            dropped_ticks = summary.dropped_ticks,
            duration_ms = summary.duration.as_millis(),
            "Session stopped"
        );

        Some(summary)
    }
}

impl<P: MotionProvider> Drop for SessionRecorder<P> {
    fn drop(&mut self) {
        self.stop_session();
    }
}

// Recover from lock poison: the sink's files and counters stay consistent
// because every mutation completes before the guard is released.
fn lock_sink(sink: &Mutex<SessionSink>) -> MutexGuard<'_, SessionSink> {
    sink.lock().unwrap_or_else(|e| {
        error!("Session sink lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

fn storage_error(
    path: &Path,
    source: io::Error,
    caller: &'static Location<'static>,
) -> CollectorError {
    CollectorError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(caller),
    }
}

fn discard_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!(path = ?dir, error = %e, "Failed to remove partially created session");
    }
}
