//! JSON schema generation for OpenAI structured outputs.
//!
//! Schemas are derived from Rust types with `schemars` and then rewritten
//! for OpenAI strict mode, which requires `additionalProperties: false`,
//! every property listed under `required`, and no `$ref` indirection.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Types usable as an OpenAI structured-output target.
///
/// Blanket-implemented for anything that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a strict-mode-compatible JSON schema for this type.
    fn openai_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = value
            .as_object()
            .and_then(|m| m.get("definitions"))
            .cloned();
        rewrite(&mut value, definitions.as_ref());

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Recursively inline `$ref`s and tighten object schemas for strict mode.
fn rewrite(value: &mut Value, definitions: Option<&Value>) {
    match value {
        Value::Object(map) => {
            // Inline a $ref before anything else, then rewrite the result.
            if let Some(Value::String(path)) = map.get("$ref") {
                let name = path.trim_start_matches("#/definitions/").to_string();
                if let Some(def) = definitions.and_then(|d| d.get(&name)) {
                    *value = def.clone();
                    rewrite(value, definitions);
                    return;
                }
            }

            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                // Strict mode wants every property required, nullable or not.
                if let Some(Value::Object(props)) = map.get("properties") {
                    let keys: Vec<Value> = props
                        .keys()
                        .map(|k| Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }

            for (_, v) in map.iter_mut() {
                rewrite(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                rewrite(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Listing {
        headline: String,
        summary: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Batch {
        listings: Vec<Listing>,
    }

    #[test]
    fn test_all_properties_required() {
        let schema = Listing::openai_schema();
        let required = schema["required"].as_array().unwrap();
        let names: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();

        // Optional fields are still listed as required in strict mode
        assert!(names.contains(&"headline"));
        assert!(names.contains(&"summary"));
    }

    #[test]
    fn test_additional_properties_disallowed() {
        let schema = Listing::openai_schema();
        assert_eq!(schema["additionalProperties"], serde_json::json!(false));
    }

    #[test]
    fn test_nested_refs_inlined() {
        let schema = Batch::openai_schema();
        let rendered = serde_json::to_string(&schema).unwrap();

        assert!(!rendered.contains("$ref"), "refs must be inlined: {rendered}");
        assert!(schema.get("definitions").is_none());
        assert!(schema.get("$schema").is_none());

        // The nested Listing schema should appear inline under items
        let items = &schema["properties"]["listings"]["items"];
        assert_eq!(items["type"], serde_json::json!("object"));
        assert_eq!(items["additionalProperties"], serde_json::json!(false));
    }
}
