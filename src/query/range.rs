use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{RExpenseError, Result};
use crate::model::StructuredOutput;
use crate::schema::SchemaType;

/// Which dates a query covers. Exactly one granularity per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeSpec {
    SpecificDate(NaiveDate),
    /// Inclusive at both ends
    DateRange { start: NaiveDate, end: NaiveDate },
    MonthYear { month: u32, year: i32 },
    Year(i32),
}

impl TimeRangeSpec {
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(RExpenseError::InvalidTimeRange(format!(
                "date range starts after it ends ({} > {})",
                start, end
            )));
        }
        Ok(TimeRangeSpec::DateRange { start, end })
    }

    pub fn month_year(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(RExpenseError::InvalidTimeRange(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(TimeRangeSpec::MonthYear { month, year })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            TimeRangeSpec::SpecificDate(d) => date == d,
            TimeRangeSpec::DateRange { start, end } => start <= date && date <= end,
            TimeRangeSpec::MonthYear { month, year } => {
                date.month() == month && date.year() == year
            }
            TimeRangeSpec::Year(year) => date.year() == year,
        }
    }

    /// Parse `get_total_expenses` tool arguments.
    ///
    /// Arguments that are not an object, or whose fields have the wrong
    /// type, are a malformed response; an object with no recognised key is
    /// an invalid time range.
    pub fn from_arguments(arguments: &Value) -> Result<Self> {
        if !arguments.is_object() {
            return Err(RExpenseError::malformed(format!(
                "time range arguments must be an object, got {}",
                arguments
            )));
        }
        let args: TimeRangeArgs = serde_json::from_value(arguments.clone())
            .map_err(|e| RExpenseError::malformed(format!("time range arguments: {}", e)))?;
        Self::try_from(args)
    }
}

impl fmt::Display for TimeRangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRangeSpec::SpecificDate(d) => write!(f, "{}", d),
            TimeRangeSpec::DateRange { start, end } => write!(f, "{} to {}", start, end),
            TimeRangeSpec::MonthYear { month, year } => write!(f, "{:04}-{:02}", year, month),
            TimeRangeSpec::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Inclusive range of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRangeArgs {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonthYearArgs {
    #[schemars(range(min = 1, max = 12))]
    pub month: u32,
    pub year: i32,
}

/// Arguments of the `get_total_expenses` tool as the model sends them.
///
/// Every key is optional on the wire. Conversion into [`TimeRangeSpec`]
/// picks the first populated key in the order `specific_date`,
/// `date_range`, `month_year`, `year`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Provide exactly one of the fields")]
pub struct TimeRangeArgs {
    /// A single day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRangeArgs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_year: Option<MonthYearArgs>,
    /// A calendar year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl TryFrom<TimeRangeArgs> for TimeRangeSpec {
    type Error = RExpenseError;

    fn try_from(args: TimeRangeArgs) -> Result<Self> {
        if let Some(date) = args.specific_date {
            Ok(TimeRangeSpec::SpecificDate(date))
        } else if let Some(range) = args.date_range {
            TimeRangeSpec::date_range(range.start_date, range.end_date)
        } else if let Some(my) = args.month_year {
            TimeRangeSpec::month_year(my.month, my.year)
        } else if let Some(year) = args.year {
            Ok(TimeRangeSpec::Year(year))
        } else {
            Err(RExpenseError::InvalidTimeRange(
                "none of specific_date, date_range, month_year or year was provided".to_string(),
            ))
        }
    }
}

impl From<TimeRangeSpec> for TimeRangeArgs {
    fn from(spec: TimeRangeSpec) -> Self {
        let mut args = TimeRangeArgs::default();
        match spec {
            TimeRangeSpec::SpecificDate(d) => args.specific_date = Some(d),
            TimeRangeSpec::DateRange { start, end } => {
                args.date_range = Some(DateRangeArgs {
                    start_date: start,
                    end_date: end,
                })
            }
            TimeRangeSpec::MonthYear { month, year } => {
                args.month_year = Some(MonthYearArgs { month, year })
            }
            TimeRangeSpec::Year(year) => args.year = Some(year),
        }
        args
    }
}

impl SchemaType for TimeRangeArgs {
    fn tool_name() -> Option<String> {
        Some("get_total_expenses".to_string())
    }

    fn tool_description() -> Option<String> {
        Some(
            "Get the total amount spent on a specific date, in a date range, in a month, \
             or in a year"
                .to_string(),
        )
    }
}

impl StructuredOutput for TimeRangeArgs {
    fn validate(&self) -> Result<()> {
        TimeRangeSpec::try_from(*self).map(|_| ())
    }
}
