//! Read side over persisted sessions.
//!
//! Discovery relies solely on the hand marker in the directory name; the
//! data root is rescanned on every call.

use crate::{
    CollectorError, CoreResult,
    session::{Hand, SessionName},
};

use std::{
    fs, io,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// One persisted session as seen by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    name: String,
    path: PathBuf,
}

impl CatalogEntry {
    /// Directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing storage.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata parsed from the name, if it follows the naming convention
    /// exactly.
    pub fn session(&self) -> Option<SessionName> {
        SessionName::parse(&self.name)
    }
}

/// Per-entry deletion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    /// Name of the entry that could not be removed.
    pub name: String,
    /// Why removal failed.
    pub reason: String,
}

/// Outcome of a batch deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Entries that were removed.
    pub removed: Vec<String>,
    /// Entries that could not be removed.
    pub failed: Vec<DeleteFailure>,
}

impl DeleteReport {
    /// Whether every requested entry was removed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Enumerates and deletes sessions under a data root.
#[derive(Debug, Clone)]
pub struct SessionCatalog {
    data_root: PathBuf,
    markers: Vec<String>,
}

impl SessionCatalog {
    /// Creates a catalog over `data_root`.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            markers: Hand::markers().collect(),
        }
    }

    /// Directory being indexed.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Fresh snapshot of every session, newest first.
    ///
    /// A data root that does not exist yet holds no sessions.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the data root cannot be read.
    #[track_caller]
    #[instrument(skip(self), fields(data_root = ?self.data_root))]
    pub fn list(&self) -> CoreResult<Vec<CatalogEntry>> {
        let dir = match fs::read_dir(&self.data_root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Data root does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.storage_error(e)),
        };

        let mut entries = Vec::new();
        for item in dir {
            let item = item.map_err(|e| self.storage_error(e))?;
            let Ok(name) = item.file_name().into_string() else {
                continue;
            };
            if self.is_session_name(&name) {
                entries.push(CatalogEntry {
                    name,
                    path: item.path(),
                });
            }
        }

        entries.sort_by(|a, b| b.name.cmp(&a.name));

        debug!(count = entries.len(), "Sessions listed");

        Ok(entries)
    }

    /// Removes each entry's backing storage.
    ///
    /// A failure is logged and reported; it neither aborts the remaining
    /// removals nor rolls back earlier ones.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn delete(&self, entries: &[CatalogEntry]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for entry in entries {
            match remove_entry(&entry.path) {
                Ok(()) => report.removed.push(entry.name.clone()),
                Err(e) => {
                    warn!(session = %entry.name, error = %e, "Failed to delete session");
                    report.failed.push(DeleteFailure {
                        name: entry.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Sessions deleted"
        );

        report
    }

    /// Deletes every listed session.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the data root cannot be listed.
    #[track_caller]
    pub fn delete_all(&self) -> CoreResult<DeleteReport> {
        let entries = self.list()?;
        Ok(self.delete(&entries))
    }

    fn is_session_name(&self, name: &str) -> bool {
        self.markers.iter().any(|marker| name.contains(marker.as_str()))
    }

    #[track_caller]
    fn storage_error(&self, source: io::Error) -> CollectorError {
        CollectorError::StorageUnavailable {
            path: self.data_root.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

fn remove_entry(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
