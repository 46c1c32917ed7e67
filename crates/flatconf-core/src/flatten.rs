//! Flattening of decoded documents
//!
//! Walks a [`Value`] tree and produces one entry per terminal path, keyed by
//! the dot-joined chain of mapping keys and sequence indices:
//!
//! ```text
//! {"a": {"b": 3.14}, "arr": [true, false]}
//!
//! a.b   = 3.14
//! arr   = [true, false]
//! arr.0 = true
//! arr.1 = false
//! ```
//!
//! Rules:
//! - Nulls produce no entry at all.
//! - A non-empty sequence whose first element is a scalar also produces a
//!   whole-array entry at its own path, typed after that first element. Every
//!   other element must then have the same kind, otherwise flattening fails
//!   with a type mismatch.
//! - Empty sequences and empty mappings vanish.
//! - A sequence starting with a mapping, sequence or null gets no whole-array
//!   entry, but its elements are still flattened under `path.N`.
//! - String leaves, including whole-array string elements, go through
//!   environment variable substitution.

use indexmap::IndexMap;

use crate::env::{self, VarLookup};
use crate::error::{Error, Result};
use crate::value::{ConfigValue, Value};

/// Flat mapping from dotted path to value
pub type FlatMap = IndexMap<String, ConfigValue>;

const SEPARATOR: char = '.';

/// Flatten `value` into a new mapping, rooted at the dotted path `prefix`
///
/// Pass an empty prefix to flatten a whole document.
pub fn flatten(value: &Value, prefix: &str, env: &dyn VarLookup) -> Result<FlatMap> {
    let mut out = FlatMap::new();
    flatten_into(value, prefix, env, &mut out)?;
    Ok(out)
}

/// Flatten `value` into an existing mapping
///
/// Entries already in `out` are overwritten when a path repeats.
pub fn flatten_into(
    value: &Value,
    prefix: &str,
    env: &dyn VarLookup,
    out: &mut FlatMap,
) -> Result<()> {
    let mut prefix = prefix.to_string();
    if !prefix.is_empty() && !prefix.ends_with(SEPARATOR) {
        prefix.push(SEPARATOR);
    }
    walk(value, &prefix, env, out)
}

/// Recursive worker; `prefix` is either empty or ends with the separator
fn walk(value: &Value, prefix: &str, env: &dyn VarLookup, out: &mut FlatMap) -> Result<()> {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                walk(child, &format!("{}{}{}", prefix, key, SEPARATOR), env, out)?;
            }
        }
        Value::Sequence(items) => {
            if let Some(array) = whole_array(items, prefix, env)? {
                log::trace!(
                    "Whole-array entry {} ({} elements)",
                    trim(prefix),
                    items.len()
                );
                insert(out, prefix, array);
            }
            for (index, item) in items.iter().enumerate() {
                walk(item, &format!("{}{}{}", prefix, index, SEPARATOR), env, out)?;
            }
        }
        Value::Number(n) => insert(out, prefix, ConfigValue::Number(*n)),
        Value::String(s) => insert(out, prefix, ConfigValue::String(env::substitute(s, env))),
        Value::Bool(b) => insert(out, prefix, ConfigValue::Bool(*b)),
        Value::Null => {}
    }
    Ok(())
}

/// Build the whole-array entry for a sequence, typed after its first element
fn whole_array(items: &[Value], prefix: &str, env: &dyn VarLookup) -> Result<Option<ConfigValue>> {
    let Some(first) = items.first() else {
        return Ok(None);
    };

    let array = match first {
        Value::String(_) => ConfigValue::StringArray(collect(items, prefix, first, |v| match v {
            Value::String(s) => Some(env::substitute(s, env)),
            _ => None,
        })?),
        Value::Number(_) => ConfigValue::NumberArray(collect(items, prefix, first, |v| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })?),
        Value::Bool(_) => ConfigValue::BoolArray(collect(items, prefix, first, |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })?),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => return Ok(None),
    };

    Ok(Some(array))
}

fn collect<T>(
    items: &[Value],
    prefix: &str,
    first: &Value,
    extract: impl Fn(&Value) -> Option<T>,
) -> Result<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            extract(item).ok_or_else(|| {
                Error::type_mismatch(
                    format!("{}{}", prefix, index),
                    first.type_name(),
                    item.type_name(),
                )
            })
        })
        .collect()
}

fn insert(out: &mut FlatMap, key: &str, value: ConfigValue) {
    out.insert(trim(key).to_string(), value);
}

fn trim(key: &str) -> &str {
    key.trim_end_matches(SEPARATOR)
}
