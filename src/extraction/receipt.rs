use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RExpenseError, Result};
use crate::ledger::{Category, ExpenseRecord, PaymentMethod};
use crate::model::StructuredOutput;
use crate::schema::SchemaType;

/// System instructions used when itemizing a receipt image.
pub const RECEIPT_INSTRUCTIONS: &str = "You are an assistant that reads shop receipts. \
Record every purchased line item with its name, the price charged for that line, \
the quantity and the best matching category. Use the date printed on the receipt \
in YYYY-MM-DD format and the vendor's name as printed. Choose the payment method \
from the allowed values; use \"Other\" when it cannot be determined.";

/// One line of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReceiptItem {
    /// Item name as printed
    pub name: String,
    /// Amount charged for this line
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64", range(min = 0))]
    pub price: Decimal,
    /// Number of units
    pub quantity: u32,
    pub category: Category,
}

/// Arguments of the `record_receipt` tool: an itemized receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Receipt", description = "An itemized shop receipt")]
pub struct Receipt {
    /// Name of the shop
    pub vendor: String,
    pub date: NaiveDate,
    /// Purchased line items
    pub items: Vec<ReceiptItem>,
    pub payment_method: PaymentMethod,
}

impl Receipt {
    /// One ledger record per line item.
    pub fn into_records(self) -> Result<Vec<ExpenseRecord>> {
        let Receipt {
            vendor,
            date,
            items,
            payment_method,
        } = self;
        items
            .into_iter()
            .map(|item| {
                ExpenseRecord::new(
                    date,
                    vendor.clone(),
                    item.name,
                    item.quantity,
                    item.price,
                    item.category,
                    payment_method,
                )
            })
            .collect()
    }

    /// Regroup ledger records into a receipt.
    ///
    /// The records must share vendor, date and payment method; returns
    /// `None` for an empty slice or mixed records.
    pub fn from_records(records: &[ExpenseRecord]) -> Option<Receipt> {
        let first = records.first()?;
        let same_receipt = records.iter().all(|r| {
            r.vendor() == first.vendor()
                && r.date() == first.date()
                && r.payment_method() == first.payment_method()
        });
        if !same_receipt {
            return None;
        }

        Some(Receipt {
            vendor: first.vendor().to_string(),
            date: first.date(),
            payment_method: first.payment_method(),
            items: records
                .iter()
                .map(|r| ReceiptItem {
                    name: r.item_name().to_string(),
                    price: r.price(),
                    quantity: r.quantity(),
                    category: r.category(),
                })
                .collect(),
        })
    }

    /// The receipt in the tool's argument shape.
    pub fn to_arguments(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode and validate `record_receipt` arguments.
    pub fn from_arguments(arguments: &Value) -> Result<Receipt> {
        Self::schema()
            .check_shape(arguments)
            .map_err(|details| RExpenseError::malformed(format!("receipt {}", details)))?;
        let receipt: Receipt = serde_json::from_value(arguments.clone())
            .map_err(|e| RExpenseError::malformed(format!("receipt: {}", e)))?;
        receipt.validate()?;
        Ok(receipt)
    }
}

impl SchemaType for Receipt {
    fn tool_name() -> Option<String> {
        Some("record_receipt".to_string())
    }

    fn tool_description() -> Option<String> {
        Some("Record the vendor, date, line items and payment method of a receipt".to_string())
    }
}

impl StructuredOutput for Receipt {
    /// A receipt is valid when it has at least one line item and every item
    /// makes a valid ledger record.
    fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(RExpenseError::malformed("receipt has no line items"));
        }
        self.clone().into_records().map(|_| ())
    }
}
