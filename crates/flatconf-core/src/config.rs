//! Main Config type for flatconf
//!
//! A [`Config`] is built once from a JSON or YAML document and is read-only
//! afterwards. Loading is the only fallible step; the typed accessors always
//! return a value, falling back to the zero value of the requested kind when
//! a key is missing or has no conversion.

use std::path::Path;
use std::time::Duration;

use crate::env::{ProcessEnv, VarLookup};
use crate::error::{Error, Result};
use crate::flatten::{self, FlatMap};
use crate::format::Format;
use crate::value::{ConfigValue, Value};

/// A flattened configuration, keyed by dotted path
///
/// Sequence elements are addressable by index (`servers.0`), so indexed
/// access is an ordinary lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: FlatMap,
}

impl Config {
    /// Create an empty Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file, substituting from the process environment
    ///
    /// The format is picked from the extension: `.json`, `.yml` or `.yaml`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, &ProcessEnv)
    }

    /// Load a configuration file, substituting variables from `env`
    pub fn load_with(path: impl AsRef<Path>, env: &dyn VarLookup) -> Result<Self> {
        let path = path.as_ref();
        let file = path.display().to_string();

        let bytes = std::fs::read(path).map_err(|e| Error::read(&file, e))?;
        let format = Format::from_path(path)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::parse(format!("Invalid UTF-8: {}", e)).with_path(&file))?;

        // Type mismatches keep the dotted key as path and name the file as cause
        let config = Self::parse_with(&content, format, env).map_err(|e| {
            if e.path.is_some() {
                e.with_cause(format!("In {}", file))
            } else {
                e.with_path(&file)
            }
        })?;

        log::debug!(
            "Loaded {} ({}): {} entries",
            file,
            format,
            config.entries.len()
        );
        Ok(config)
    }

    /// Decode and flatten in-memory content, substituting from the process environment
    pub fn parse(content: &str, format: Format) -> Result<Self> {
        Self::parse_with(content, format, &ProcessEnv)
    }

    /// Decode and flatten in-memory content, substituting variables from `env`
    pub fn parse_with(content: &str, format: Format, env: &dyn VarLookup) -> Result<Self> {
        let value = format.decode(content)?;
        Self::from_value(&value, env)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, Format::Json)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, Format::Yaml)
    }

    /// Flatten an already decoded value
    pub fn from_value(value: &Value, env: &dyn VarLookup) -> Result<Self> {
        Ok(Self {
            entries: flatten::flatten(value, "", env)?,
        })
    }

    /// Get the stored value at a path, without conversion
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        self.entries.get(path)
    }

    /// Check whether a path is present
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of entries, counting whole-array and indexed keys separately
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the configuration has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all dotted paths
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrow the underlying flat mapping
    pub fn as_map(&self) -> &FlatMap {
        &self.entries
    }

    /// Consume the Config, returning the flat mapping
    pub fn into_inner(self) -> FlatMap {
        self.entries
    }

    /// Get a string value, converting numbers, booleans and arrays
    pub fn get_string(&self, path: &str) -> String {
        self.get(path)
            .map(ConfigValue::coerce_string)
            .unwrap_or_default()
    }

    /// Get a float value
    pub fn get_float(&self, path: &str) -> f64 {
        self.get(path)
            .map(ConfigValue::coerce_float)
            .unwrap_or_default()
    }

    /// Get an integer value, truncating the float value toward zero
    pub fn get_int(&self, path: &str) -> i64 {
        self.get(path).map(ConfigValue::coerce_int).unwrap_or_default()
    }

    /// Get a boolean value
    pub fn get_bool(&self, path: &str) -> bool {
        self.get(path)
            .map(ConfigValue::coerce_bool)
            .unwrap_or_default()
    }

    /// Get a duration, parsed from the string value (e.g. `10h10m`)
    pub fn get_duration(&self, path: &str) -> Duration {
        self.get(path)
            .map(ConfigValue::coerce_duration)
            .unwrap_or_default()
    }

    /// Get a list of strings
    pub fn get_string_array(&self, path: &str) -> Vec<String> {
        self.get(path)
            .map(ConfigValue::coerce_string_array)
            .unwrap_or_default()
    }

    /// Get a list of floats
    pub fn get_float_array(&self, path: &str) -> Vec<f64> {
        self.get(path)
            .map(ConfigValue::coerce_float_array)
            .unwrap_or_default()
    }

    /// Get a list of integers
    pub fn get_int_array(&self, path: &str) -> Vec<i64> {
        self.get(path)
            .map(ConfigValue::coerce_int_array)
            .unwrap_or_default()
    }

    /// Get a list of booleans
    pub fn get_bool_array(&self, path: &str) -> Vec<bool> {
        self.get(path)
            .map(ConfigValue::coerce_bool_array)
            .unwrap_or_default()
    }

    /// Get a list of durations; unparsable elements are zero
    pub fn get_duration_array(&self, path: &str) -> Vec<Duration> {
        self.get(path)
            .map(ConfigValue::coerce_duration_array)
            .unwrap_or_default()
    }
}

impl From<FlatMap> for Config {
    fn from(entries: FlatMap) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
