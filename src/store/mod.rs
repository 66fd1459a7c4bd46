//! The record store: in-memory batches and their CSV representation.
pub mod batch;
pub mod csv_io;
pub mod types;

pub use batch::Batch;
pub use csv_io::{is_null_token, load_batch, load_batch_from_reader, write_table};
pub use types::{Cell, KeyColumns, Record, RecordId, REQUIRED_COLUMNS};
