/// Position of a record within its batch (0-based, input order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordId(pub u32);

impl RecordId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// One cell of a record. `None` is a null cell.
pub type Cell = Option<String>;

/// One transaction, with cells aligned to the batch header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub cells: Vec<Cell>,
}

impl Record {
    #[inline(always)]
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }
}

/// The columns every batch must carry.
pub const TXN_ID: &str = "txn_id";
pub const AMOUNT: &str = "amount";
pub const DATE: &str = "date";
pub const COUNTRY: &str = "country";
pub const CUSTOMER_ID: &str = "customer_id";

pub const REQUIRED_COLUMNS: [&str; 5] = [TXN_ID, AMOUNT, DATE, COUNTRY, CUSTOMER_ID];

/// Header positions of the required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub txn_id: usize,
    pub amount: usize,
    pub date: usize,
    pub country: usize,
    pub customer_id: usize,
}
