use serde_json::Value;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether `value` is an instance of the JSON Schema primitive `expected`.
/// Unknown type names match anything.
fn is_kind(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

pub(super) fn check_value(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    if let Some(allowed) = schema.get("enum").and_then(Value::as_array)
        && !allowed.contains(value)
    {
        return Err(format!(
            "{}: {} is not one of {}",
            path,
            value,
            Value::Array(allowed.clone())
        ));
    }

    let types: Vec<&str> = match schema.get("type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    if types.is_empty() {
        // Optional nested types come out as anyOf [<schema>, null]
        return match schema.get("anyOf").and_then(Value::as_array) {
            Some(branches) => check_any_of(branches, value, path),
            None => Ok(()),
        };
    }

    let Some(expected) = types.iter().copied().find(|t| is_kind(t, value)) else {
        return Err(format!(
            "{}: expected {}, got {}",
            path,
            types.join(" or "),
            kind(value)
        ));
    };

    match expected {
        "object" => check_object(schema, value, path),
        "array" => check_array(schema, value, path),
        _ => Ok(()),
    }
}

fn check_any_of(branches: &[Value], value: &Value, path: &str) -> Result<(), String> {
    let mut first_error = None;
    for branch in branches {
        match check_value(branch, value, path) {
            Ok(()) => return Ok(()),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn check_object(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Ok(());
    };

    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect::<Vec<_>>())
        .unwrap_or_default();
    for key in required {
        if matches!(object.get(key), None | Some(Value::Null)) {
            return Err(format!("{}: missing required field '{}'", path, key));
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, property) in properties {
            match object.get(key) {
                None | Some(Value::Null) => {}
                Some(field) => check_value(property, field, &format!("{}.{}", path, key))?,
            }
        }
    }
    Ok(())
}

fn check_array(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    let (Some(items), Some(item_schema)) = (value.as_array(), schema.get("items")) else {
        return Ok(());
    };
    for (i, item) in items.iter().enumerate() {
        check_value(item_schema, item, &format!("{}[{}]", path, i))?;
    }
    Ok(())
}
