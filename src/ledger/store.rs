use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::{ExpenseRecord, Ledger};
use crate::error::{RExpenseError, Result};

/// Column headers of the ledger file, in order.
pub const CSV_HEADERS: [&str; 7] = [
    "Date",
    "Vendor",
    "Name",
    "Quantity",
    "Price",
    "Category",
    "Payment method",
];

/// Flat CSV file holding the whole ledger.
///
/// The file is always read and written in full. `save` writes a sibling
/// temp file and renames it over the target, so a crash mid-write leaves
/// the previous ledger intact.
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full ledger. A missing or zero-byte file is an empty ledger.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            debug!("Ledger file does not exist yet, starting empty");
            return Ok(Ledger::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.io_error("read", e))?;

        let headers = reader.headers().map_err(|e| self.io_error("read", e))?;
        if headers.is_empty() {
            debug!("Ledger file is empty, starting empty");
            return Ok(Ledger::new());
        }
        if headers.iter().ne(CSV_HEADERS.iter().copied()) {
            return Err(RExpenseError::StoreIo(format!(
                "{}: unexpected header {:?}, expected {:?}",
                self.path.display(),
                headers.iter().collect::<Vec<_>>(),
                CSV_HEADERS
            )));
        }

        let mut ledger = Ledger::new();
        for (row, result) in reader.deserialize::<ExpenseRecord>().enumerate() {
            let record = result.map_err(|e| self.io_error("parse", e))?;
            record.check().map_err(|e| {
                RExpenseError::StoreIo(format!(
                    "{}: row {}: {}",
                    self.path.display(),
                    row + 2,
                    e
                ))
            })?;
            ledger.append(record);
        }

        info!(records = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }

    /// Rewrite the file with the full ledger.
    #[instrument(skip(self, ledger), fields(path = %self.path.display(), records = ledger.len()))]
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let tmp_path = self.tmp_path();
        if let Err(e) = self.write_all(&tmp_path, ledger) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(error = %cleanup, "Could not remove partial ledger file");
            }
            return Err(e);
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error("replace", e))?;
        info!("Saved ledger");
        Ok(())
    }

    /// Load, append `records`, and save. Returns the updated ledger.
    pub fn append(&self, records: impl IntoIterator<Item = ExpenseRecord>) -> Result<Ledger> {
        let mut ledger = self.load()?;
        let before = ledger.len();
        ledger.extend(records);
        debug!(added = ledger.len() - before, "Appending records to ledger");
        self.save(&ledger)?;
        Ok(ledger)
    }

    fn write_all(&self, path: &Path, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        // Header is written explicitly so an empty ledger still has one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| self.io_error("write", e))?;
        writer
            .write_record(CSV_HEADERS)
            .map_err(|e| self.io_error("write", e))?;
        for record in ledger {
            writer
                .serialize(record)
                .map_err(|e| self.io_error("write", e))?;
        }
        writer.flush().map_err(|e| self.io_error("write", e))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, action: &str, e: impl std::fmt::Display) -> RExpenseError {
        RExpenseError::StoreIo(format!("cannot {} {}: {}", action, self.path.display(), e))
    }
}
