use crate::{
    motion::MotionReading,
    session::{
        Channel, LiveReadout,
        channel::{ChannelFile, ChannelWriter},
    },
};

use std::{fs::File, io, path::Path};

use tracing::{debug, error, warn};

/// The open channel files of one session plus per-session counters.
pub(crate) struct SessionSink<F: ChannelFile = File> {
    writers: Option<(ChannelWriter<F>, ChannelWriter<F>)>,
    rows: u64,
    dropped_ticks: u64,
}

impl SessionSink<File> {
    /// Creates `acc.txt` and `gyro.txt` in `dir` with their headers.
    pub(crate) fn create(dir: &Path) -> io::Result<Self> {
        let [acc, gyro] = Channel::ALL;
        let acc = ChannelWriter::create(dir, acc)?;
        let gyro = ChannelWriter::create(dir, gyro)?;

        Ok(Self::from_writers(acc, gyro))
    }
}

impl<F: ChannelFile> SessionSink<F> {
    pub(crate) fn from_writers(acc: ChannelWriter<F>, gyro: ChannelWriter<F>) -> Self {
        Self {
            writers: Some((acc, gyro)),
            rows: 0,
            dropped_ticks: 0,
        }
    }

    /// Rows present in both channel files.
    pub(crate) fn rows(&self) -> u64 {
        self.rows
    }

    /// Ticks that reached neither file.
    pub(crate) fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    /// Writes one tick to both channels, or to neither.
    ///
    /// Returns the converted samples for every finite reading, whether or
    /// not they could be stored. A closed sink ignores ticks.
    pub(crate) fn record(&mut self, reading: &MotionReading) -> Option<LiveReadout> {
        let (acc, gyro) = self.writers.as_mut()?;

        if !reading.is_finite() {
            self.drop_tick("reading is not finite");
            return None;
        }

        let readout = LiveReadout {
            acceleration: reading.acceleration(),
            rotation: reading.rotation(),
        };
        let acc_row = readout.acceleration.to_csv_row();
        let gyro_row = readout.rotation.to_csv_row();
        let acc_len = acc.len();

        if let Err(e) = acc.append(&acc_row) {
            self.drop_tick(&e.to_string());
            return Some(readout);
        }

        if let Err(e) = gyro.append(&gyro_row) {
            if let Err(rollback) = acc.truncate(acc_len) {
                error!(
                    path = ?acc.path(),
                    error = %rollback,
                    "Failed to roll back acceleration row, channel row counts diverge"
                );
            }
            self.drop_tick(&e.to_string());
            return Some(readout);
        }

        self.rows += 1;
        Some(readout)
    }

    /// Flushes and closes both files. Later ticks are ignored.
    pub(crate) fn close(&mut self) {
        let Some((acc, gyro)) = self.writers.take() else {
            return;
        };

        for writer in [acc, gyro] {
            let path = writer.path().to_path_buf();
            if let Err(e) = writer.close() {
                warn!(path = ?path, error = %e, "Failed to flush channel file on close");
            }
        }
    }

    fn drop_tick(&mut self, reason: &str) {
        self.dropped_ticks += 1;
        if self.dropped_ticks == 1 {
            warn!(reason, "Dropping tick, further drops logged at debug");
        } else {
            debug!(reason, dropped_ticks = self.dropped_ticks, "Dropping tick");
        }
    }
}
