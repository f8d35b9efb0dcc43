use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::entry::{AuditEntry, AUDIT_HEADER};

/// Append-only CSV audit log, one writer lock per file
///
/// The file is opened lazily: a log that cannot be opened at startup is
/// retried on every append instead of failing the caller.
pub struct AuditLog {
    writer: Mutex<Option<csv::Writer<File>>>,
    path: PathBuf,
}

impl AuditLog {
    /// Try to open the file now; failures are logged and retried on append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let log = Self {
            writer: Mutex::new(None),
            path: path.into(),
        };

        match open_writer(&log.path) {
            Ok(writer) => {
                *log.writer.lock() = Some(writer);
                log::info!("Audit log ready: {}", log.path.display());
            }
            Err(e) => {
                log::error!(
                    "Audit log unavailable at {}: {} (will retry on next write)",
                    log.path.display(),
                    e
                );
            }
        }
        log
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.lock().is_some()
    }

    /// Append one row; reopens the file if it is not currently open
    pub fn append(&self, entry: &AuditEntry) -> io::Result<()> {
        let mut guard = self.writer.lock();

        if guard.is_none() {
            *guard = Some(open_writer(&self.path)?);
        }

        let result = match guard.as_mut() {
            Some(writer) => writer
                .write_record(entry.to_fields())
                .map_err(io::Error::from)
                .and_then(|_| writer.flush()),
            None => Ok(()),
        };

        if result.is_err() {
            // Force a reopen on the next append
            *guard = None;
        }
        result
    }
}

/// Create parent directories, open for append, write the header if empty
fn open_writer(path: &Path) -> io::Result<csv::Writer<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_empty = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);

    if is_empty {
        writer.write_record(AUDIT_HEADER).map_err(io::Error::from)?;
        writer.flush()?;
    }

    Ok(writer)
}
