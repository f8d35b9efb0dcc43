//! Audit Module - Prediction Log
//!
//! Every prediction is appended as one CSV row. The pipeline treats the log
//! as a write-only sink: failures are reported through `log` and counted,
//! never returned to the caller.
//!
//! ## Structure
//! - `entry.rs` - AuditEntry (one row, probability rounded to 4 dp)
//! - `writer.rs` - Append-only CSV writer with a per-file lock

pub mod entry;
pub mod writer;


pub use entry::{round_probability, AuditEntry, AUDIT_HEADER, TIMESTAMP_FORMAT};
pub use writer::AuditLog;

use crate::error::DetectResult;

/// Destination for audit entries
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> DetectResult<()>;
}

impl AuditSink for AuditLog {
    fn record(&self, entry: &AuditEntry) -> DetectResult<()> {
        self.append(entry)?;
        Ok(())
    }
}
