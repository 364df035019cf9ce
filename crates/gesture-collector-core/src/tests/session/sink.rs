use crate::{
    Channel,
    session::{
        channel::{ChannelFile, ChannelWriter},
        sink::SessionSink,
    },
    tests::support::reading,
};

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tempfile::TempDir;

/// Real file whose writes and truncations can be made to fail.
///
/// A failing write stores the first half of the buffer before erroring, the
/// way a full disk leaves a torn row behind.
struct FlakyFile {
    file: File,
    switches: Switches,
}

#[derive(Clone, Default)]
struct Switches {
    fail_writes: Arc<AtomicBool>,
    fail_set_len: Arc<AtomicBool>,
}

impl Switches {
    fn writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn set_len(&self, fail: bool) {
        self.fail_set_len.store(fail, Ordering::SeqCst);
    }
}

impl Write for FlakyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.switches.fail_writes.load(Ordering::SeqCst) {
            self.file.write_all(&buf[..buf.len() / 2])?;
            return Err(io::Error::other("no space left on device"));
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl ChannelFile for FlakyFile {
    fn set_len(&self, len: u64) -> io::Result<()> {
        if self.switches.fail_set_len.load(Ordering::SeqCst) {
            return Err(io::Error::other("read-only file system"));
        }
        self.file.set_len(len)
    }

    fn sync_all(&self) -> io::Result<()> {
        self.file.sync_all()
    }
}

fn flaky_writer(dir: &Path, channel: Channel, switches: &Switches) -> ChannelWriter<FlakyFile> {
    let path = dir.join(channel.file_name());
    let file = OpenOptions::new()
        .append(true)
        .create_new(true)
        .open(&path)
        .unwrap();
    let file = FlakyFile {
        file,
        switches: switches.clone(),
    };
    ChannelWriter::with_header(file, path, channel).unwrap()
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

/// WHAT: A gyro write failure rolls the acceleration row back
/// WHY: Both channel files must keep the same number of rows
#[test]
fn given_failing_gyro_file_when_recording_then_acc_rolled_back_and_tick_dropped() {
    // Given: A sink whose gyro file fails on the second tick
    let dir = TempDir::new().unwrap();
    let acc_switches = Switches::default();
    let gyro_switches = Switches::default();
    let mut sink = SessionSink::from_writers(
        flaky_writer(dir.path(), Channel::Acceleration, &acc_switches),
        flaky_writer(dir.path(), Channel::Rotation, &gyro_switches),
    );
    assert!(sink.record(&reading(0)).is_some());

    // When: The gyro append fails
    gyro_switches.writes(true);
    let readout = sink.record(&reading(1));

    // Then: The tick is dropped from both files but still reported live
    assert_eq!(readout.map(|r| r.rotation), Some(reading(1).rotation()));
    assert_eq!(sink.rows(), 1);
    assert_eq!(sink.dropped_ticks(), 1);
    let acc = dir.path().join("acc.txt");
    let gyro = dir.path().join("gyro.txt");
    assert_eq!(line_count(&acc), 2);
    assert_eq!(line_count(&gyro), 2);
    assert!(fs::read_to_string(&gyro).unwrap().ends_with('\n'));

    // And: Recording resumes in step once the disk recovers
    gyro_switches.writes(false);
    sink.record(&reading(2));
    sink.close();
    assert_eq!(sink.rows(), 2);
    assert_eq!(line_count(&acc), 3);
    assert_eq!(line_count(&gyro), 3);
}

/// WHAT: An acceleration write failure drops the tick before gyro is touched
/// WHY: A tick lands in both files or in neither
#[test]
fn given_failing_acc_file_when_recording_then_neither_file_grows() {
    // Given: A sink whose acceleration file fails
    let dir = TempDir::new().unwrap();
    let acc_switches = Switches::default();
    let mut sink = SessionSink::from_writers(
        flaky_writer(dir.path(), Channel::Acceleration, &acc_switches),
        flaky_writer(dir.path(), Channel::Rotation, &Switches::default()),
    );
    acc_switches.writes(true);

    // When: Recording two ticks
    sink.record(&reading(0));
    sink.record(&reading(1));
    sink.close();

    // Then: Both files hold only their header
    assert_eq!(sink.rows(), 0);
    assert_eq!(sink.dropped_ticks(), 2);
    assert_eq!(line_count(&dir.path().join("acc.txt")), 1);
    assert_eq!(line_count(&dir.path().join("gyro.txt")), 1);
}

/// WHAT: A writer that cannot cut a torn row away refuses further rows
/// WHY: Appending after a fragment would corrupt every following line
#[test]
fn given_failed_cut_back_when_appending_again_then_row_refused() {
    // Given: A write that tears and a truncation that also fails
    let dir = TempDir::new().unwrap();
    let switches = Switches::default();
    let mut writer = flaky_writer(dir.path(), Channel::Acceleration, &switches);
    let row = reading(0).acceleration().to_csv_row();
    writer.append(&row).unwrap();
    switches.writes(true);
    switches.set_len(true);
    assert!(writer.append(&row).is_err());
    let torn = fs::read_to_string(dir.path().join("acc.txt")).unwrap();

    // When: The disk recovers and another row is offered
    switches.writes(false);
    switches.set_len(false);
    let result = writer.append(&row);

    // Then: The row is refused and the file is left as it was
    assert!(result.is_err());
    assert!(writer.truncate(writer.len()).is_err());
    assert_eq!(
        fs::read_to_string(dir.path().join("acc.txt")).unwrap(),
        torn
    );
}

/// WHAT: Closed sinks and non-finite ticks produce no live readout
/// WHY: The readout must only show samples that describe a real tick
#[test]
fn given_nan_tick_or_closed_sink_when_recording_then_no_readout() {
    // Given: An open sink
    let dir = TempDir::new().unwrap();
    let mut sink = SessionSink::create(dir.path()).unwrap();
    let mut broken = reading(0);
    broken.rotation_rate.y = f64::NAN;

    // When/Then: A NaN tick is dropped without a readout
    assert_eq!(sink.record(&broken), None);
    assert_eq!(sink.dropped_ticks(), 1);

    // When/Then: A closed sink ignores ticks entirely
    sink.close();
    assert_eq!(sink.record(&reading(1)), None);
    assert_eq!(sink.rows(), 0);
    assert_eq!(sink.dropped_ticks(), 1);
}
