use serde_json::{Map, Value, json};

use super::Schema;

/// SchemaBuilder helps construct JSON Schema incrementally.
///
/// Properties keep the order they were added in, so the schema sent to the
/// model reads the same way the builder call does.
#[derive(Default)]
pub struct SchemaBuilder {
    schema_type: String,
    title: Option<String>,
    description: Option<String>,
    properties: Vec<(String, Value)>,
    required: Vec<String>,
    items: Option<Value>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            ..Default::default()
        }
    }

    pub fn object() -> Self {
        Self::new()
    }

    pub fn array(items: Value) -> Self {
        Self {
            schema_type: "array".to_string(),
            items: Some(items),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add (or replace) a property. Re-adding a name keeps its original position.
    pub fn property(
        mut self,
        name: impl Into<String>,
        property_schema: Value,
        required: bool,
    ) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = property_schema,
            None => self.properties.push((name.clone(), property_schema)),
        }
        if required && !self.required.contains(&name) {
            self.required.push(name);
        } else if !required {
            self.required.retain(|n| *n != name);
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema::new(self.build_value())
    }

    /// Build the raw JSON value, for nesting inside another builder.
    pub fn build_value(self) -> Value {
        let mut schema = json!({
            "type": self.schema_type
        });

        if let Some(title) = self.title {
            schema["title"] = json!(title);
        }

        if let Some(description) = self.description {
            schema["description"] = json!(description);
        }

        if self.schema_type == "object" {
            let properties: Map<String, Value> = self.properties.into_iter().collect();
            schema["properties"] = Value::Object(properties);
            if !self.required.is_empty() {
                schema["required"] = json!(self.required);
            }
        } else if let Some(items) = self.items {
            schema["items"] = items;
        }

        schema
    }
}
