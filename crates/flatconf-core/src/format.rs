//! Decoder selection and raw parsing

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::value::Value;

/// Supported document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick a format from the file extension (`json`, `yml` or `yaml`)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(extension)
            .ok_or_else(|| Error::unsupported_format(path.display().to_string(), extension))
    }

    /// Map an extension without the leading dot
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Decode `content` into an untyped value tree
    ///
    /// Empty (or whitespace-only) content is rejected for both formats. YAML
    /// merge keys (`<<: *anchor`) are resolved before the tree is returned.
    pub fn decode(self, content: &str) -> Result<Value> {
        if content.trim().is_empty() {
            return Err(Error::parse(format!("Empty {} document", self)));
        }

        match self {
            Format::Json => serde_json::from_str(content).map_err(|e| Error::parse(e.to_string())),
            Format::Yaml => {
                let mut value: Value =
                    serde_yaml::from_str(content).map_err(|e| Error::parse(e.to_string()))?;
                value.resolve_merge_keys();
                Ok(value)
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
        }
    }
}
