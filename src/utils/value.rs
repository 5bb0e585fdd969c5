//! Conversion of TOML values into template values.
//!
//! `toml::Value` serializes datetimes as a private wrapper struct, which
//! templates cannot print. Everything passed to the renderer goes through
//! [`toml_to_tera`] instead, turning datetimes into their TOML string form.

use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;
use tera::{Map, Number, Value};

pub fn toml_to_tera(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number((*i).into()),
        toml::Value::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_tera).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(key, value)| (key.clone(), toml_to_tera(value)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

/// `serialize_with` adapter for maps of TOML values.
pub fn serialize_toml_map<S: Serializer>(
    map: &BTreeMap<String, toml::Value>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (key, value) in map {
        out.serialize_entry(key, &toml_to_tera(value))?;
    }
    out.end()
}

/// Wrapper giving a TOML map the template-friendly serialization.
pub struct TomlMap<'a>(pub &'a BTreeMap<String, toml::Value>);

impl Serialize for TomlMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_toml_map(self.0, serializer)
    }
}
