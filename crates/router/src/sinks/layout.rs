//! JSON layout shared by the line and datagram sinks
//!
//! Output shape: `{"time":..,"level":..,"msg":..,<attrs>}`. Each scope opens a
//! nested object; attributes attached before a scope stay at their depth.
//! A root-level attribute named like a built-in field is written as
//! `attr.<key>` so the built-in value is kept.

use chrono::SecondsFormat;
use serde_json::{Map, Number, Value as JsonValue};

use contracts::{Attr, LogRecord, Value};

const BUILTIN_KEYS: [&str; 3] = ["time", "level", "msg"];

/// Accumulated attributes and scopes of a derived sink
#[derive(Debug, Clone, Default)]
pub struct JsonLayout {
    scopes: Vec<String>,
    /// (scope depth, attribute)
    attrs: Vec<(usize, Attr)>,
}

impl JsonLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout with `attrs` attached at the current scope depth
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        let depth = self.scopes.len();
        let mut next = self.clone();
        next.attrs.extend(attrs.into_iter().map(|attr| (depth, attr)));
        next
    }

    /// Layout with one more scope level
    pub fn with_scope(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !name.is_empty() {
            next.scopes.push(name.to_string());
        }
        next
    }

    fn attrs_at(&self, depth: usize) -> Map<String, JsonValue> {
        let mut map = Map::new();
        for (_, attr) in self.attrs.iter().filter(|(d, _)| *d == depth) {
            insert_attr(&mut map, attr);
        }
        map
    }

    /// Build the JSON object for `record`
    pub fn to_object(&self, record: &LogRecord) -> Map<String, JsonValue> {
        let mut inner = self.attrs_at(self.scopes.len());
        for attr in &record.attrs {
            insert_attr(&mut inner, attr);
        }

        for depth in (0..self.scopes.len()).rev() {
            let mut outer = self.attrs_at(depth);
            if !inner.is_empty() {
                outer.insert(self.scopes[depth].clone(), JsonValue::Object(inner));
            }
            inner = outer;
        }

        let mut root = Map::new();
        root.insert(
            "time".to_string(),
            JsonValue::String(record.time.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        root.insert(
            "level".to_string(),
            JsonValue::String(record.level.as_str().to_string()),
        );
        root.insert(
            "msg".to_string(),
            JsonValue::String(record.message.clone()),
        );
        for (key, value) in inner {
            if BUILTIN_KEYS.contains(&key.as_str()) {
                root.insert(format!("attr.{key}"), value);
            } else {
                root.insert(key, value);
            }
        }
        root
    }

    /// Encode `record` as one newline-terminated JSON line
    pub fn encode_line(&self, record: &LogRecord) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = serde_json::to_vec(&JsonValue::Object(self.to_object(record)))?;
        buf.push(b'\n');
        Ok(buf)
    }
}

fn insert_attr(map: &mut Map<String, JsonValue>, attr: &Attr) {
    match &attr.value {
        Value::Group(children) if attr.key.is_empty() => {
            for child in children {
                insert_attr(map, child);
            }
        }
        Value::Group(children) => {
            let mut nested = Map::new();
            for child in children {
                insert_attr(&mut nested, child);
            }
            if !nested.is_empty() {
                map.insert(attr.key.clone(), JsonValue::Object(nested));
            }
        }
        other => {
            map.insert(attr.key.clone(), scalar_to_json(other));
        }
    }
}

fn scalar_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Int(v) => JsonValue::Number((*v).into()),
        Value::Uint(v) => JsonValue::Number((*v).into()),
        // NaN / infinity have no JSON number form
        Value::Float(v) => Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string())),
        Value::String(v) => JsonValue::String(v.clone()),
        Value::Group(_) => JsonValue::Null,
    }
}
