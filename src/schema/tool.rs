use serde_json::Value;

use super::{Schema, SchemaType};
use crate::error::{RExpenseError, Result};

/// A callable signature offered to the model.
///
/// The model may answer a request either with free text or by "calling" one
/// of the offered tools, in which case it returns arguments that should
/// match `parameters`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

impl ToolSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Schema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Tool whose arguments are an instance of `T`.
    pub fn for_type<T: SchemaType>() -> Self {
        let parameters = T::schema();
        let name = T::tool_name().unwrap_or_else(|| "output".to_string());
        let description = T::tool_description()
            .or_else(|| parameters.description().map(str::to_string))
            .unwrap_or_else(|| format!("Return the extracted data as {}", name));
        Self::new(name, description, parameters)
    }

    /// Check decoded arguments against the parameter schema.
    pub fn check_arguments(&self, arguments: &Value) -> Result<()> {
        self.parameters.check_shape(arguments).map_err(|details| {
            RExpenseError::malformed(format!("arguments for '{}' {}", self.name, details))
        })
    }
}

/// How the model may use the offered tools.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// The model decides whether to call a tool
    #[default]
    Auto,
    /// Never call a tool
    None,
    /// Always call the named tool
    Function(String),
}
