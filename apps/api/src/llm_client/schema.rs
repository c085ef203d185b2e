//! Builders for the `responseSchema` objects sent alongside JSON prompts.
//!
//! The Generative Language API takes an OpenAPI-style subset with upper-case
//! type names.

use serde_json::{json, Map, Value};

pub fn string() -> Value {
    json!({ "type": "STRING" })
}

pub fn number() -> Value {
    json!({ "type": "NUMBER" })
}

pub fn array(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

/// An object schema. Every listed property is marked required.
pub fn object(properties: &[(&str, Value)]) -> Value {
    let mut props = Map::new();
    for (name, schema) in properties {
        props.insert((*name).to_string(), schema.clone());
    }
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "OBJECT",
        "properties": props,
        "required": required,
    })
}
