//! Time-range filters over the ledger and the `get_total_expenses` tool.

mod aggregate;
mod range;

pub use aggregate::{filter_records, total_expenses, total_expenses_from_arguments};
pub use range::{DateRangeArgs, MonthYearArgs, TimeRangeArgs, TimeRangeSpec};
