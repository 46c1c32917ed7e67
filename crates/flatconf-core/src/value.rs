//! Configuration value types
//!
//! [`Value`] is the untyped tree produced by the JSON/YAML decoders: scalars
//! (string, number, bool, null), sequences and mappings. [`ConfigValue`] is
//! what remains after flattening: a scalar or a homogeneous array, never a
//! nested structure.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use std::fmt;

/// A decoded document node
///
/// Every number is held as `f64`, whether the source spelled it as an
/// integer or not.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// String value (may name an environment variable, e.g. `${HOME}`)
    String(String),
    /// Sequence of values
    Sequence(Vec<Value>),
    /// Mapping of string keys to values
    Mapping(IndexMap<String, Value>),
}

/// YAML merge key, as in `<<: *defaults`
const MERGE_KEY: &str = "<<";

impl Value {
    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Resolve YAML merge keys in place, at every depth
    ///
    /// A `<<` entry holding a mapping, or a sequence of mappings, is removed
    /// and its entries are copied into the enclosing mapping. Keys set
    /// explicitly in that mapping win; with several sources, earlier ones win.
    /// A `<<` entry holding anything else is left as an ordinary key.
    pub fn resolve_merge_keys(&mut self) {
        match self {
            Value::Sequence(items) => items.iter_mut().for_each(Value::resolve_merge_keys),
            Value::Mapping(map) => {
                map.values_mut().for_each(Value::resolve_merge_keys);

                let mergeable = match map.get(MERGE_KEY) {
                    Some(Value::Mapping(_)) => true,
                    Some(Value::Sequence(items)) => {
                        items.iter().all(|item| matches!(item, Value::Mapping(_)))
                    }
                    _ => false,
                };
                if !mergeable {
                    return;
                }

                let sources = match map.shift_remove(MERGE_KEY) {
                    Some(Value::Mapping(source)) => vec![source],
                    Some(Value::Sequence(items)) => items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Mapping(source) => Some(source),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                for source in sources {
                    for (key, value) in source {
                        map.entry(key).or_insert(value);
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON or YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // A repeated key replaces the earlier entry along with its whole subtree
        let mut entries = IndexMap::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

/// A flattened configuration entry
///
/// Arrays are always homogeneous. Serializes as the bare scalar or list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Number(f64),
    Bool(bool),
    StringArray(Vec<String>),
    NumberArray(Vec<f64>),
    BoolArray(Vec<bool>),
}

impl ConfigValue {
    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Number(_) => "number",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::StringArray(_) => "string array",
            ConfigValue::NumberArray(_) => "number array",
            ConfigValue::BoolArray(_) => "boolean array",
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(v: Vec<String>) -> Self {
        ConfigValue::StringArray(v)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(v: Vec<&str>) -> Self {
        ConfigValue::StringArray(v.into_iter().map(String::from).collect())
    }
}

impl From<Vec<f64>> for ConfigValue {
    fn from(v: Vec<f64>) -> Self {
        ConfigValue::NumberArray(v)
    }
}

impl From<Vec<bool>> for ConfigValue {
    fn from(v: Vec<bool>) -> Self {
        ConfigValue::BoolArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(entries: Vec<(&str, Value)>) -> Value {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_json_integers_become_numbers() {
        let value: Value = serde_json::from_str(r#"{"port": 5432, "neg": -3}"#).unwrap();
        assert_eq!(
            value,
            mapping(vec![
                ("port", Value::Number(5432.0)),
                ("neg", Value::Number(-3.0)),
            ])
        );
    }

    #[test]
    fn test_yaml_and_json_decode_to_same_tree() {
        let json: Value =
            serde_json::from_str(r#"{"a": {"b": 3.14, "c": [true, null], "d": "x"}}"#).unwrap();
        let yaml: Value = serde_yaml::from_str("a:\n  b: 3.14\n  c: [true, ~]\n  d: x\n").unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_duplicate_key_replaces_whole_subtree() {
        let value: Value = serde_json::from_str(r#"{"x": {"p": 1}, "x": {"q": 2}}"#).unwrap();
        assert_eq!(
            value,
            mapping(vec![("x", mapping(vec![("q", Value::Number(2.0))]))])
        );
    }

    #[test]
    fn test_yaml_duplicate_key_last_wins() {
        let value: Value = serde_yaml::from_str("x:\n  p: 1\nx:\n  q: 2\n").unwrap();
        assert_eq!(
            value,
            mapping(vec![("x", mapping(vec![("q", Value::Number(2.0))]))])
        );
    }

    #[test]
    fn test_yaml_null_document() {
        let value: Value = serde_yaml::from_str("null").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(1.5).type_name(), "number");
        assert_eq!(Value::from("s").type_name(), "string");
        assert_eq!(Value::from(vec![1.0]).type_name(), "sequence");
        assert_eq!(Value::Mapping(IndexMap::new()).type_name(), "mapping");
        assert_eq!(ConfigValue::from(vec![true]).type_name(), "boolean array");
    }

    #[test]
    fn test_config_value_serializes_untagged() {
        let json = serde_json::to_string(&ConfigValue::from(vec![1.0, 2.5])).unwrap();
        assert_eq!(json, "[1.0,2.5]");
        let json = serde_json::to_string(&ConfigValue::from("foo")).unwrap();
        assert_eq!(json, "\"foo\"");
    }

    fn yaml(content: &str) -> Value {
        let mut value: Value = serde_yaml::from_str(content).unwrap();
        value.resolve_merge_keys();
        value
    }

    #[test]
    fn test_merge_key_copies_anchor_entries() {
        let value = yaml("base: &b\n  p: 1\nderived:\n  <<: *b\n  q: 2\n");
        assert_eq!(
            value,
            mapping(vec![
                ("base", mapping(vec![("p", Value::Number(1.0))])),
                (
                    "derived",
                    mapping(vec![("q", Value::Number(2.0)), ("p", Value::Number(1.0))])
                ),
            ])
        );
    }

    #[test]
    fn test_merge_key_never_overrides_explicit_keys() {
        let value = yaml("base: &b\n  p: 1\n  q: 1\nderived:\n  q: 2\n  <<: *b\n");
        let Value::Mapping(root) = value else {
            panic!("expected a mapping");
        };
        assert_eq!(
            root["derived"],
            mapping(vec![("q", Value::Number(2.0)), ("p", Value::Number(1.0))])
        );
    }

    #[test]
    fn test_merge_key_sequence_earlier_source_wins() {
        let value = yaml(
            "a: &a {x: 1}\nb: &b {x: 2, y: 2}\nc:\n  <<: [*a, *b]\n",
        );
        let Value::Mapping(root) = value else {
            panic!("expected a mapping");
        };
        assert_eq!(
            root["c"],
            mapping(vec![("x", Value::Number(1.0)), ("y", Value::Number(2.0))])
        );
    }

    #[test]
    fn test_merge_key_with_scalar_stays_a_key() {
        let value = yaml("a:\n  <<: plain\n");
        assert_eq!(
            value,
            mapping(vec![("a", mapping(vec![("<<", Value::from("plain"))]))])
        );
    }
}
