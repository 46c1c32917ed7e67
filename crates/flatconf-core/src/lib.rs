//! flatconf-core: Flattening configuration loader
//!
//! This crate loads a JSON or YAML document, flattens it into a single-level
//! mapping keyed by dotted path, substitutes environment variables into
//! string values, and exposes typed accessors with best-effort conversions.
//!
//! # Example
//!
//! ```rust
//! use flatconf_core::Config;
//!
//! let yaml = r#"
//! database:
//!   host: localhost
//!   port: 5432
//!   replicas: [db1, db2]
//! "#;
//!
//! let config = Config::from_yaml(yaml).unwrap();
//! assert_eq!(config.get_string("database.host"), "localhost");
//! assert_eq!(config.get_int("database.port"), 5432);
//! assert_eq!(config.get_string("database.port"), "5432");
//! assert_eq!(config.get_string_array("database.replicas"), vec!["db1", "db2"]);
//! assert_eq!(config.get_string("database.replicas.1"), "db2");
//! assert!(!config.get_bool("database.missing"));
//! ```

pub mod coerce;
pub mod env;
pub mod error;
pub mod flatten;
pub mod format;
pub mod value;

mod config;

pub use config::Config;
pub use env::{ProcessEnv, VarLookup};
pub use error::{Error, ErrorKind, Result};
pub use flatten::FlatMap;
pub use format::Format;
pub use value::{ConfigValue, Value};
