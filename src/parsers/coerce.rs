use serde_json::Map;
use tracing::trace;

use crate::models::{BoolMode, Coercion, FieldType, Header, Value};

/// Converts raw tokens into typed [`Value`]s
///
/// Sentinel handling:
/// - The unset (`-`) and empty (`(empty)`) sentinels read as an empty string
/// - String-like columns keep the empty string
/// - Numeric and bool columns return `None` so the key is dropped, never zeroed
///
/// A token that fails to parse as its numeric type is also `None`. That is a per-key
/// skip, not an error: the rest of the record is unaffected.
#[derive(Debug, Clone)]
pub struct TypeCoercer {
    unset_field: String,
    empty_field: String,
    bool_mode: BoolMode,
}

impl TypeCoercer {
    pub fn new(header: &Header, bool_mode: BoolMode) -> Self {
        Self {
            unset_field: header.unset_field().to_string(),
            empty_field: header.empty_field().to_string(),
            bool_mode,
        }
    }

    pub fn coerce(&self, raw: &str, field_type: &FieldType) -> Option<Value> {
        let raw = if raw == self.unset_field || raw == self.empty_field { "" } else { raw };

        let value = match field_type.coercion() {
            Coercion::Text => Some(Value::String(raw.to_string())),
            Coercion::Unsigned => raw.parse::<u64>().ok().map(Value::Count),
            Coercion::Float => raw.parse::<f64>().ok().filter(|n| n.is_finite()).map(Value::Double),
            Coercion::Boolean => self.coerce_bool(raw).map(Value::Bool),
        };

        if value.is_none() && !raw.is_empty() {
            trace!(raw, field_type = %field_type, "Dropping value that does not convert");
        }
        value
    }

    fn coerce_bool(&self, raw: &str) -> Option<bool> {
        if raw.is_empty() {
            return None;
        }
        match self.bool_mode {
            BoolMode::Truthy => Some(true),
            BoolMode::Strict => match raw {
                "T" | "true" => Some(true),
                "F" | "false" => Some(false),
                _ => None,
            },
        }
    }

    /// Coerce a document that a collaborator has already structured
    ///
    /// String leaves whose key is a declared field are converted with [`Self::coerce`] and
    /// removed when that yields nothing. Nested objects are walked with the same rules.
    /// Keys the header does not declare are left untouched.
    pub fn coerce_object(
        &self,
        header: &Header,
        object: Map<String, serde_json::Value>,
    ) -> Map<String, serde_json::Value> {
        let mut coerced = Map::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Object(nested) => {
                    let nested = self.coerce_object(header, nested);
                    coerced.insert(key, serde_json::Value::Object(nested));
                }
                serde_json::Value::String(raw) => match header.field_type(&key) {
                    Some(field_type) => {
                        if let Some(value) = self.coerce(&raw, field_type) {
                            coerced.insert(key, value.into());
                        }
                    }
                    None => {
                        coerced.insert(key, serde_json::Value::String(raw));
                    }
                },
                other => {
                    coerced.insert(key, other);
                }
            }
        }
        coerced
    }
}
