//! JSON Schema descriptions handed to the model as tool parameters.

mod builder;
mod shape;
mod tool;

pub use builder::SchemaBuilder;
pub use tool::{ToolChoice, ToolSchema};

use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde_json::Value;
use std::fmt;

/// A JSON Schema describing the structure the model should return.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub schema: Value,
}

impl Schema {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }

    /// Schema derived from `T`'s `JsonSchema` implementation.
    ///
    /// Nested types are inlined rather than referenced through `$defs`, so
    /// the result can be checked with [`Schema::check_shape`] as-is.
    pub fn for_type<T: JsonSchema + ?Sized>() -> Self {
        let generator = SchemaSettings::draft07()
            .with(|settings| settings.inline_subschemas = true)
            .into_generator();
        let mut schema = generator.into_root_schema_for::<T>().to_value();
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }
        Self::new(schema)
    }

    /// The schema's top-level `description`, taken from the type's doc comment.
    pub fn description(&self) -> Option<&str> {
        self.schema.get("description").and_then(Value::as_str)
    }

    pub fn to_json(&self) -> &Value {
        &self.schema
    }

    /// Create a schema builder for an object type
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::object()
    }

    /// Check that `value` has the basic shape this schema declares.
    ///
    /// Only `type`, `anyOf`, `required`, `properties`, `items` and `enum`
    /// are looked at; formats and numeric bounds are left to deserialization and
    /// domain validation. The error names the offending JSON path.
    pub fn check_shape(&self, value: &Value) -> std::result::Result<(), String> {
        shape::check_value(&self.schema, value, "$")
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.schema)
    }
}

/// A type offered to the model as a tool's arguments.
///
/// The parameter schema is derived with `schemars`, so it always matches
/// the type's serde shape; implementors only name the tool.
pub trait SchemaType: JsonSchema {
    fn schema() -> Schema {
        Schema::for_type::<Self>()
    }

    /// Name used for the tool that returns this type
    fn tool_name() -> Option<String> {
        None
    }

    /// Description shown to the model; defaults to the type's doc comment
    fn tool_description() -> Option<String> {
        None
    }
}
