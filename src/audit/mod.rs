//! The audit recorder: an append-only CSV history with one row per run.
//!
//! The header is written only when the history is created. Existing rows are
//! never rewritten or reordered. Concurrent writers to the same file are not
//! coordinated here; callers that run several validators against one history
//! must serialize the append themselves.
use crate::error::{Result, StorageError};
use crate::report::{RunStatus, RunSummary};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const RUN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the audit history. Field order is the column order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(with = "run_time")]
    pub run_time: NaiveDateTime,
    pub missing_values: usize,
    pub negative_amounts: usize,
    pub duplicate_txn_id: usize,
    pub invalid_dates: usize,
    pub future_dates: usize,
    pub total_errors: usize,
    pub run_status: RunStatus,
}

impl AuditEntry {
    pub fn new(run_time: NaiveDateTime, summary: &RunSummary) -> Self {
        let c = summary.counts;
        Self {
            // Sub-second precision is not representable in the history.
            run_time: run_time.with_nanosecond(0).unwrap_or(run_time),
            missing_values: c.missing_values,
            negative_amounts: c.negative_amounts,
            duplicate_txn_id: c.duplicate_txn_id,
            invalid_dates: c.invalid_dates,
            future_dates: c.future_dates,
            total_errors: summary.total_errors,
            run_status: summary.run_status,
        }
    }
}

mod run_time {
    use super::RUN_TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(RUN_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, RUN_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

fn ends_with_newline(file: &mut std::fs::File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Handle on an audit history file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry`, creating the history (with its header) on first use.
    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        let label = self.path.display().to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StorageError::Open { path: label.clone(), source })?;
        let len = file.metadata().map_err(|e| StorageError::write(&label, e))?.len();
        let is_new = len == 0;

        // A history edited by hand may lack its final newline; terminate the
        // last entry so the new row starts on its own line.
        if !is_new && !ends_with_newline(&mut file, len).map_err(|e| StorageError::write(&label, e))? {
            file.write_all(b"\n").map_err(|e| StorageError::write(&label, e))?;
        }

        let mut wtr = csv::WriterBuilder::new().has_headers(is_new).from_writer(file);
        wtr.serialize(entry).map_err(|e| StorageError::csv(&label, e))?;
        let mut file = wtr
            .into_inner()
            .map_err(|e| StorageError::write(&label, e.into_error()))?;
        file.flush().map_err(|e| StorageError::write(&label, e))?;

        tracing::info!(
            audit_log = %label,
            created = is_new,
            run_status = %entry.run_status,
            total_errors = entry.total_errors,
            "audit entry appended"
        );
        Ok(())
    }

    /// Reads the history back in write order. A history that does not exist
    /// yet is empty.
    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let label = self.path.display().to_string();
        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| StorageError::csv(&label, e))?;
        rdr.deserialize::<AuditEntry>()
            .map(|row| row.map_err(|e| StorageError::csv(&label, e).into()))
            .collect()
    }
}
