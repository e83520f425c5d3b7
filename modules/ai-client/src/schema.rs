use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Types a backend is asked to emit as JSON.
///
/// Blanket-implemented for any `JsonSchema + DeserializeOwned` type. Backends
/// in JSON mode only guarantee *syntactically* valid JSON, so the schema is
/// embedded in the prompt and the reply is still validated by deserializing.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Self-contained JSON schema: `$ref`s inlined, `definitions` and
    /// `$schema` removed.
    fn response_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    /// Prompt fragment instructing the model to answer with this schema.
    fn schema_instructions() -> String {
        let schema = serde_json::to_string_pretty(&Self::response_schema()).unwrap_or_default();
        format!("Respond with a single JSON object matching this JSON Schema:\n{schema}")
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn inline_refs(value: &mut Value) {
    let definitions = match value {
        Value::Object(map) => map.get("definitions").cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref") {
                if let Some(def) = ref_path
                    .strip_prefix("#/definitions/")
                    .and_then(|name| definitions.get(name))
                {
                    *value = def.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            // schemars wraps a lone `$ref` in `allOf` when it carries a description.
            if let Some(Value::Array(all_of)) = map.get("allOf") {
                if let [single] = all_of.as_slice() {
                    *value = single.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
