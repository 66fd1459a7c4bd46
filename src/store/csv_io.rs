//! Delimited-file adapter for batches and run artifacts.
//!
//! Every artifact except the audit history is written through a temporary file
//! in the destination directory and then persisted over the target, so a failed
//! run never leaves a truncated output behind.
use super::batch::Batch;
use super::types::Cell;
use crate::error::{Result, StorageError};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Cell spellings read as null.
pub const NULL_TOKENS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

pub fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

fn to_cell(raw: &str) -> Cell {
    if is_null_token(raw) { None } else { Some(raw.to_string()) }
}

/// Loads a batch from a CSV file with a header row.
pub fn load_batch(path: &Path) -> Result<Batch> {
    let label = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|source| StorageError::Open { path: label.clone(), source })?;
    load_batch_from_reader(file, &label)
}

/// Same as [`load_batch`], for any reader. `label` only names the source in errors.
pub fn load_batch_from_reader<R: Read>(reader: R, label: &str) -> Result<Batch> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| StorageError::csv(label, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| StorageError::csv(label, e))?;
        if record.len() > columns.len() {
            return Err(StorageError::RaggedRow {
                path: label.to_string(),
                line: record.position().map_or(0, |p| p.line()),
                expected: columns.len(),
                found: record.len(),
            }
            .into());
        }
        rows.push(record.iter().map(to_cell).collect());
    }

    tracing::debug!(source = label, rows = rows.len(), columns = columns.len(), "batch loaded");
    Batch::new(columns, rows)
}

/// Writes `header` and `rows` to `path`, replacing any previous file only once
/// every row has been flushed.
pub fn write_table<I, R>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let label = path.display().to_string();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::write(&label, e))?;

    let mut wtr = csv::Writer::from_writer(tmp);
    wtr.write_record(header).map_err(|e| StorageError::csv(&label, e))?;
    for row in rows {
        wtr.write_record(row).map_err(|e| StorageError::csv(&label, e))?;
    }
    let mut tmp = wtr
        .into_inner()
        .map_err(|e| StorageError::write(&label, e.into_error()))?;
    tmp.flush().map_err(|e| StorageError::write(&label, e))?;

    tmp.persist(path)
        .map_err(|source| StorageError::Persist { path: label, source })?;
    Ok(())
}
