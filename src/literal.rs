//! GraphQL literal syntax for argument values.
use serde_json::Value;

/// Render a JSON value as a GraphQL input literal. Strings are quoted; use
/// [`render_enum`] for enum names.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // JSON string escapes are a subset of GraphQL's
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(items) => render_list(items, render_value),
        Value::Object(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| format!("{k}: {}", render_value(v)))
                .collect::<Vec<_>>();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Like [`render_value`], but strings are emitted bare (enum value names).
pub fn render_enum(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => render_list(items, render_enum),
        other => render_value(other),
    }
}

fn render_list(items: &[Value], item: fn(&Value) -> String) -> String {
    format!("[{}]", items.iter().map(item).collect::<Vec<_>>().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_and_strings() {
        assert_eq!(render_value(&json!(null)), "null");
        assert_eq!(render_value(&json!(7)), "7");
        assert_eq!(render_value(&json!(false)), "false");
        assert_eq!(render_value(&json!("say \"hi\"")), r#""say \"hi\"""#);
    }

    #[test]
    fn input_objects_keep_field_order() {
        let v = json!({ "b": 1, "a": ["x", null] });
        assert_eq!(render_value(&v), r#"{b: 1, a: ["x", null]}"#);
    }

    #[test]
    fn enums_render_bare() {
        assert_eq!(render_enum(&json!("RED")), "RED");
        assert_eq!(render_enum(&json!(["RED", "BLUE"])), "[RED, BLUE]");
        assert_eq!(render_enum(&json!(null)), "null");
    }
}
