use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::schema::SchemaType;

/// A type the model can be asked to produce through a forced tool call.
///
/// Combines schema generation, (de)serialization and domain validation.
/// `validate` runs after the arguments have been deserialized; a failure
/// there is reported to the caller as a malformed response.
///
/// ```
/// use rexpense::schema::SchemaType;
/// use rexpense::{RExpenseError, StructuredOutput};
/// use schemars::JsonSchema;
/// use serde::{Deserialize, Serialize};
///
/// /// Record the tip left on a bill.
/// #[derive(Serialize, Deserialize, JsonSchema)]
/// struct Tip {
///     /// Tip as a percentage of the bill
///     percent: f64,
/// }
///
/// impl SchemaType for Tip {
///     fn tool_name() -> Option<String> {
///         Some("record_tip".to_string())
///     }
/// }
///
/// impl StructuredOutput for Tip {
///     fn validate(&self) -> rexpense::Result<()> {
///         if self.percent < 0.0 {
///             return Err(RExpenseError::malformed("tip cannot be negative"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(Tip { percent: -1.0 }.validate().is_err());
/// ```
pub trait StructuredOutput: SchemaType + DeserializeOwned + Serialize {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
