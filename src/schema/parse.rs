//! Lowering of raw JSON-Schema fragments into the typed [`Schema`] tree.
//!
//! The contract parser hands us schemas as `serde_json::Value`. Lowering
//! happens once per document load; nothing here runs on the request path.

use super::{ArraySchema, NumberSchema, ObjectSchema, Schema, SchemaKind, StringSchema};
use serde_json::Value;
use std::collections::BTreeSet;

const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

impl Schema {
    /// Lower a JSON-Schema fragment into a typed [`Schema`].
    ///
    /// Unknown or unclassifiable fragments lower to [`SchemaKind::Any`]
    /// rather than failing: a mock server must keep serving even when one
    /// field of one contract is exotic.
    #[must_use]
    pub fn from_value(value: &Value) -> Schema {
        let obj = match value {
            Value::Object(obj) => obj,
            // `true`/`false` are valid schemas in draft 2020-12.
            _ => return Schema::of(SchemaKind::Any),
        };

        if let Some(ref_path) = obj.get("$ref").and_then(Value::as_str) {
            let name = ref_path
                .strip_prefix(COMPONENT_SCHEMA_PREFIX)
                .unwrap_or(ref_path);
            return Schema::of(SchemaKind::Reference(name.to_string()));
        }

        let example = obj.get("example").cloned().or_else(|| {
            // OAS 3.1 style: `examples` is an array; take the first entry.
            obj.get("examples")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .cloned()
        });
        let enum_values = obj
            .get("enum")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .cloned();

        let kind = if let Some(children) = composite(obj, "allOf") {
            SchemaKind::AllOf(children)
        } else if let Some(children) = composite(obj, "oneOf") {
            SchemaKind::OneOf(children)
        } else if let Some(children) = composite(obj, "anyOf") {
            SchemaKind::AnyOf(children)
        } else {
            match type_name(obj) {
                Some("boolean") => SchemaKind::Boolean,
                Some("string") => SchemaKind::String(string_schema(obj)),
                Some("integer") => SchemaKind::Integer(number_schema(obj)),
                Some("number") => SchemaKind::Number(number_schema(obj)),
                Some("object") => SchemaKind::Object(object_schema(obj)),
                Some("array") => SchemaKind::Array(array_schema(obj)),
                Some("null") => SchemaKind::Null,
                // No `type`: infer from structural keywords.
                None if obj.contains_key("properties") => SchemaKind::Object(object_schema(obj)),
                None if obj.contains_key("items") => SchemaKind::Array(array_schema(obj)),
                _ => SchemaKind::Any,
            }
        };

        Schema {
            kind,
            example,
            enum_values,
        }
    }
}

/// `type` may be a string or (3.1) an array like `["string", "null"]`.
/// For an array we take the first non-null entry.
fn type_name(obj: &serde_json::Map<String, Value>) -> Option<&str> {
    match obj.get("type") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .or(Some("null")),
        _ => None,
    }
}

fn composite(obj: &serde_json::Map<String, Value>, keyword: &str) -> Option<Vec<Schema>> {
    let arr = obj.get(keyword)?.as_array()?;
    if arr.is_empty() {
        return None;
    }
    Some(arr.iter().map(Schema::from_value).collect())
}

fn string_schema(obj: &serde_json::Map<String, Value>) -> StringSchema {
    StringSchema {
        format: obj
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string),
        pattern: obj
            .get("pattern")
            .and_then(Value::as_str)
            .map(str::to_string),
        min_length: usize_field(obj, "minLength"),
        max_length: usize_field(obj, "maxLength"),
    }
}

fn number_schema(obj: &serde_json::Map<String, Value>) -> NumberSchema {
    let mut schema = NumberSchema {
        minimum: obj.get("minimum").and_then(Value::as_f64),
        maximum: obj.get("maximum").and_then(Value::as_f64),
        exclusive_minimum: false,
        exclusive_maximum: false,
    };
    // OAS 3.0 uses boolean exclusivity flags next to minimum/maximum;
    // 3.1 (JSON Schema) makes the exclusive keyword carry the bound itself.
    match obj.get("exclusiveMinimum") {
        Some(Value::Bool(b)) => schema.exclusive_minimum = *b,
        Some(v) => {
            if let Some(n) = v.as_f64() {
                schema.minimum = Some(n);
                schema.exclusive_minimum = true;
            }
        }
        None => {}
    }
    match obj.get("exclusiveMaximum") {
        Some(Value::Bool(b)) => schema.exclusive_maximum = *b,
        Some(v) => {
            if let Some(n) = v.as_f64() {
                schema.maximum = Some(n);
                schema.exclusive_maximum = true;
            }
        }
        None => {}
    }
    schema
}

fn object_schema(obj: &serde_json::Map<String, Value>) -> ObjectSchema {
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| (name.clone(), Schema::from_value(schema)))
                .collect()
        })
        .unwrap_or_default();
    let required: BTreeSet<String> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    ObjectSchema {
        properties,
        required,
    }
}

fn array_schema(obj: &serde_json::Map<String, Value>) -> ArraySchema {
    ArraySchema {
        items: obj
            .get("items")
            .map(|items| Box::new(Schema::from_value(items))),
        min_items: usize_field(obj, "minItems"),
        max_items: usize_field(obj, "maxItems"),
    }
}

fn usize_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<usize> {
    obj.get(key).and_then(Value::as_u64).map(|n| n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_stays_symbolic() {
        let schema = Schema::from_value(&json!({ "$ref": "#/components/schemas/Pet" }));
        assert_eq!(schema.kind, SchemaKind::Reference("Pet".to_string()));
    }

    #[test]
    fn test_string_constraints() {
        let schema = Schema::from_value(&json!({
            "type": "string",
            "format": "email",
            "minLength": 3,
            "maxLength": 40
        }));
        match schema.kind {
            SchemaKind::String(s) => {
                assert_eq!(s.format.as_deref(), Some("email"));
                assert_eq!(s.min_length, Some(3));
                assert_eq!(s.max_length, Some(40));
            }
            other => panic!("expected string schema, got {other:?}"),
        }
    }

    #[test]
    fn test_exclusive_bounds_boolean_style() {
        let schema = Schema::from_value(&json!({
            "type": "integer",
            "minimum": 0,
            "exclusiveMinimum": true
        }));
        match schema.kind {
            SchemaKind::Integer(n) => {
                assert_eq!(n.minimum, Some(0.0));
                assert!(n.exclusive_minimum);
            }
            other => panic!("expected integer schema, got {other:?}"),
        }
    }

    #[test]
    fn test_exclusive_bounds_numeric_style() {
        let schema = Schema::from_value(&json!({
            "type": "number",
            "exclusiveMaximum": 10.5
        }));
        match schema.kind {
            SchemaKind::Number(n) => {
                assert_eq!(n.maximum, Some(10.5));
                assert!(n.exclusive_maximum);
            }
            other => panic!("expected number schema, got {other:?}"),
        }
    }

    #[test]
    fn test_object_without_type_keyword() {
        let schema = Schema::from_value(&json!({
            "properties": {
                "id": { "type": "integer" },
                "name": { "type": "string" }
            },
            "required": ["id"]
        }));
        match schema.kind {
            SchemaKind::Object(o) => {
                assert_eq!(o.properties.len(), 2);
                assert!(o.required.contains("id"));
                assert!(!o.required.contains("name"));
            }
            other => panic!("expected object schema, got {other:?}"),
        }
    }

    #[test]
    fn test_nullable_type_array_picks_non_null() {
        let schema = Schema::from_value(&json!({ "type": ["string", "null"] }));
        assert!(matches!(schema.kind, SchemaKind::String(_)));
    }

    #[test]
    fn test_enum_and_example_carried() {
        let schema = Schema::from_value(&json!({
            "type": "string",
            "enum": ["available", "pending", "sold"],
            "example": "available"
        }));
        assert_eq!(schema.example, Some(json!("available")));
        assert_eq!(schema.enum_values.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_one_of_children() {
        let schema = Schema::from_value(&json!({
            "oneOf": [
                { "type": "string" },
                { "type": "integer" }
            ]
        }));
        match schema.kind {
            SchemaKind::OneOf(children) => assert_eq!(children.len(), 2),
            other => panic!("expected oneOf, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_fragment_is_any() {
        assert_eq!(Schema::from_value(&json!(true)).kind, SchemaKind::Any);
        assert_eq!(Schema::from_value(&json!({})).kind, SchemaKind::Any);
    }
}
