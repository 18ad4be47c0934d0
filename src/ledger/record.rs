use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RExpenseError, Result};

/// Declares a closed vocabulary serialized as human-readable strings. The
/// derived JSON Schema is a string enum of the labels.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $description:literal, { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[schemars(description = $description)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RExpenseError;

            /// Case-insensitive match on the label.
            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        RExpenseError::malformed(format!(
                            "unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

labelled_enum! {
    /// Spending category of a single line item.
    Category, "Spending category of the item", {
        Groceries => "Groceries",
        Dining => "Dining",
        Household => "Household",
        PersonalCare => "Personal care",
        Electronics => "Electronics",
        Clothing => "Clothing",
        Transport => "Transport",
        Entertainment => "Entertainment",
        Health => "Health",
        Other => "Other",
    }
}

labelled_enum! {
    /// How a receipt was paid.
    PaymentMethod, "How the purchase was paid", {
        Cash => "Cash",
        CreditCard => "Credit card",
        DebitCard => "Debit card",
        MobilePayment => "Mobile payment",
        GiftCard => "Gift card",
        Other => "Other",
    }
}

/// One purchased line item, as stored in the ledger.
///
/// Fields are private: a record is built once (from an extracted receipt or
/// a ledger row) and never changed afterwards. The serde names are the CSV
/// column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Vendor")]
    vendor: String,
    #[serde(rename = "Name")]
    item_name: String,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Price", with = "rust_decimal::serde::str")]
    price: Decimal,
    #[serde(rename = "Category")]
    category: Category,
    #[serde(rename = "Payment method")]
    payment_method: PaymentMethod,
}

impl ExpenseRecord {
    /// Build a record. Vendor and item name are trimmed; an empty vendor or
    /// a negative price is rejected.
    pub fn new(
        date: NaiveDate,
        vendor: impl Into<String>,
        item_name: impl Into<String>,
        quantity: u32,
        price: Decimal,
        category: Category,
        payment_method: PaymentMethod,
    ) -> Result<Self> {
        let record = Self {
            date,
            vendor: vendor.into().trim().to_string(),
            item_name: item_name.into().trim().to_string(),
            quantity,
            price,
            category,
            payment_method,
        };
        record.check()?;
        Ok(record)
    }

    /// Re-check invariants on a record that arrived through deserialization.
    pub(crate) fn check(&self) -> Result<()> {
        if self.vendor.trim().is_empty() {
            return Err(RExpenseError::malformed(format!(
                "vendor of '{}' is empty",
                self.item_name
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(RExpenseError::malformed(format!(
                "price of '{}' cannot be negative ({})",
                self.item_name, self.price
            )));
        }
        Ok(())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}
