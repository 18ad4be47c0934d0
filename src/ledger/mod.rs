//! The expense ledger: an append-only list of line items, and its CSV store.

mod record;
mod store;

pub use record::{Category, ExpenseRecord, PaymentMethod};
pub use store::{CSV_HEADERS, CsvLedgerStore};

/// Append-only sequence of expense records.
///
/// Order is the order records were added in; queries never rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ExpenseRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ExpenseRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExpenseRecord> {
        self.records.iter()
    }
}

impl From<Vec<ExpenseRecord>> for Ledger {
    fn from(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a ExpenseRecord;
    type IntoIter = std::slice::Iter<'a, ExpenseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
