use crate::catalog::CatalogEntry;

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

/// Written between consecutive sessions in a merged payload.
pub const ENTRY_DELIMITER: &str = "\n---\n";

/// What ended up in a merged payload.
#[derive(Debug, Default)]
pub(crate) struct PayloadSummary {
    pub(crate) sessions: Vec<String>,
    pub(crate) skipped: Vec<String>,
    pub(crate) bytes: u64,
}

/// Concatenates the raw bytes of `entries` into a new file at `out`.
///
/// Each entry contributes its files in name order (a plain-file entry
/// contributes itself). Entries that cannot be read are skipped and listed
/// in the summary. Fails only when `out` cannot be written.
pub(crate) fn write_payload(entries: &[CatalogEntry], out: &Path) -> io::Result<PayloadSummary> {
    let mut writer = BufWriter::new(File::create_new(out)?);
    let mut summary = PayloadSummary::default();

    for entry in entries {
        let contents = match read_entry(entry.path()) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(session = %entry.name(), error = %e, "Skipping unreadable session");
                summary.skipped.push(entry.name().to_string());
                continue;
            }
        };

        if !summary.sessions.is_empty() {
            writer.write_all(ENTRY_DELIMITER.as_bytes())?;
            summary.bytes += ENTRY_DELIMITER.len() as u64;
        }
        writer.write_all(&contents)?;
        summary.bytes += contents.len() as u64;
        summary.sessions.push(entry.name().to_string());
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    debug!(
        path = ?out,
        sessions = summary.sessions.len(),
        bytes = summary.bytes,
        "Payload written"
    );

    Ok(summary)
}

fn read_entry(path: &Path) -> io::Result<Vec<u8>> {
    if !fs::metadata(path)?.is_dir() {
        return fs::read(path);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for item in fs::read_dir(path)? {
        match item {
            Ok(item) if item.path().is_file() => files.push(item.path()),
            Ok(_) => {}
            Err(e) => warn!(dir = ?path, error = %e, "Skipping unreadable entry in session"),
        }
    }
    files.sort();

    let mut contents = Vec::new();
    for file in files {
        contents.extend(fs::read(file)?);
    }
    Ok(contents)
}
