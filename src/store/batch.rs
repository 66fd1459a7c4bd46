use super::types::*;
use crate::error::{QualityError, Result};

/// An ordered, fully loaded set of records sharing one header.
#[derive(Debug, Clone)]
pub struct Batch {
    columns: Vec<String>,
    keys: KeyColumns,
    records: Vec<Record>,
}

impl Batch {
    /// Builds a batch from a header and raw rows. Rows shorter than the header
    /// are padded with null cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| QualityError::MissingColumn { column: name.to_string() })
        };
        let keys = KeyColumns {
            txn_id: position(TXN_ID)?,
            amount: position(AMOUNT)?,
            date: position(DATE)?,
            country: position(COUNTRY)?,
            customer_id: position(CUSTOMER_ID)?,
        };

        let width = columns.len();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx, mut cells)| {
                cells.resize(width, None);
                Record { id: RecordId::new(idx), cells }
            })
            .collect();

        Ok(Self { columns, keys, records })
    }

    /// Convenience for tests and callers holding string data in memory.
    /// Cells are taken verbatim; `None` marks a null.
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<Option<&str>>]) -> Result<Self> {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
            .collect();
        Self::new(columns, rows)
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn keys(&self) -> KeyColumns { self.keys }
    pub fn records(&self) -> &[Record] { &self.records }

    #[inline(always)]
    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[inline(always)]
    pub fn txn_id<'a>(&self, record: &'a Record) -> Option<&'a str> {
        record.cell(self.keys.txn_id)
    }
}
