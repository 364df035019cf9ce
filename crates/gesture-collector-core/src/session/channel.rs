use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::error;

/// The two sample channels persisted per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Gravity-compensated acceleration, m/s².
    Acceleration,
    /// Angular rate, rad/s.
    Rotation,
}

impl Channel {
    /// Both channels, in the order their files sort.
    pub const ALL: [Self; 2] = [Self::Acceleration, Self::Rotation];

    /// File name inside the session directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Acceleration => "acc.txt",
            Self::Rotation => "gyro.txt",
        }
    }

    /// Header row, including the trailing newline.
    pub fn header(self) -> &'static str {
        match self {
            Self::Acceleration => "timestamp_ns,acc_x,acc_y,acc_z\n",
            Self::Rotation => "timestamp_ns,gyro_x,gyro_y,gyro_z\n",
        }
    }
}

/// Storage behind a [`ChannelWriter`].
pub(crate) trait ChannelFile: Write + Send {
    /// Truncates or extends the underlying file to `len` bytes.
    fn set_len(&self, len: u64) -> io::Result<()>;

    /// Flushes data and metadata to stable storage.
    fn sync_all(&self) -> io::Result<()>;
}

impl ChannelFile for File {
    fn set_len(&self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    fn sync_all(&self) -> io::Result<()> {
        File::sync_all(self)
    }
}

/// Append-only writer for one channel file.
///
/// Every row goes out in a single unbuffered write, so a row that was
/// accepted survives an abrupt stop as a complete line. Once the file can
/// no longer be cut back to its last complete row, the writer refuses
/// further rows instead of appending after the fragment.
pub(crate) struct ChannelWriter<F: ChannelFile = File> {
    file: F,
    path: PathBuf,
    len: u64,
    failed: bool,
}

impl ChannelWriter<File> {
    /// Creates the channel file (failing if it exists) and writes the header.
    pub(crate) fn create(dir: &Path, channel: Channel) -> io::Result<Self> {
        let path = dir.join(channel.file_name());
        let file = OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)?;

        Self::with_header(file, path, channel)
    }
}

impl<F: ChannelFile> ChannelWriter<F> {
    /// Wraps an empty `file` and writes the channel header into it.
    pub(crate) fn with_header(mut file: F, path: PathBuf, channel: Channel) -> io::Result<Self> {
        let header = channel.header();
        file.write_all(header.as_bytes())?;

        Ok(Self {
            file,
            path,
            len: header.len() as u64,
            failed: false,
        })
    }

    /// Appends one complete row.
    ///
    /// On failure the file is cut back to its previous length so no partial
    /// line remains.
    pub(crate) fn append(&mut self, row: &str) -> io::Result<()> {
        self.ensure_usable()?;

        if let Err(e) = self.file.write_all(row.as_bytes()) {
            self.cut_back(self.len);
            return Err(e);
        }
        self.len += row.len() as u64;
        Ok(())
    }

    /// Length of the file after the last accepted row.
    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    /// Drops every row written after `len`.
    pub(crate) fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.ensure_usable()?;

        if let Err(e) = self.file.set_len(len) {
            self.mark_failed(&e);
            return Err(e);
        }
        self.len = len;
        Ok(())
    }

    /// Flushes to stable storage and closes the handle.
    pub(crate) fn close(mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_usable(&self) -> io::Result<()> {
        if self.failed {
            return Err(io::Error::other(format!(
                "{} holds an unrecoverable partial row",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn cut_back(&mut self, len: u64) {
        if let Err(e) = self.file.set_len(len) {
            self.mark_failed(&e);
        }
    }

    fn mark_failed(&mut self, cause: &io::Error) {
        error!(
            path = ?self.path,
            error = %cause,
            "Failed to cut channel file back to its last row, refusing further rows"
        );
        self.failed = true;
    }
}
