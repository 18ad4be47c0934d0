use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use super::TimeRangeSpec;
use crate::error::{RExpenseError, Result};
use crate::ledger::ExpenseRecord;

/// Records whose date falls inside `spec`, in their original order.
pub fn filter_records<'a>(
    spec: &TimeRangeSpec,
    records: &'a [ExpenseRecord],
) -> Vec<&'a ExpenseRecord> {
    records.iter().filter(|r| spec.contains(r.date())).collect()
}

/// Sum of `price` over the records inside `spec`; zero when none match.
///
/// Each row's `price` is added as-is. Quantity is not multiplied in: the
/// ledger stores the amount charged per line. A sum that does not fit in a
/// `Decimal` is an [`RExpenseError::Overflow`].
pub fn total_expenses(spec: &TimeRangeSpec, records: &[ExpenseRecord]) -> Result<Decimal> {
    let matched = filter_records(spec, records);
    let total = matched.iter().try_fold(Decimal::ZERO, |acc, r| {
        acc.checked_add(r.price()).ok_or_else(|| {
            RExpenseError::Overflow(format!("total of {} exceeds the decimal range", spec))
        })
    })?;
    debug!(range = %spec, matched = matched.len(), total = %total, "Aggregated expenses");
    Ok(total)
}

/// Parse `get_total_expenses` arguments and aggregate in one step.
pub fn total_expenses_from_arguments(
    arguments: &Value,
    records: &[ExpenseRecord],
) -> Result<Decimal> {
    let spec = TimeRangeSpec::from_arguments(arguments)?;
    total_expenses(&spec, records)
}
