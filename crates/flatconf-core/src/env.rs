//! Environment variable substitution
//!
//! A string leaf that starts with `$` names an environment variable: every
//! `$`, `{` and `}` is removed from it and the remainder is looked up. An
//! unset variable substitutes the empty string. Strings that do not start
//! with `$` pass through untouched.
//!
//! Lookups go through [`VarLookup`] so callers (and tests) can supply their
//! own variables instead of the process environment.

use std::collections::HashMap;

/// Resolves an environment variable name to its value
pub trait VarLookup {
    /// Return the value of `name`, or `None` if it is unset
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: std::hash::BuildHasher> VarLookup for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<F> VarLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Substitute `value` from `env` if it is a variable reference
pub fn substitute(value: &str, env: &dyn VarLookup) -> String {
    if !value.starts_with('$') {
        return value.to_string();
    }

    let name: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | '{' | '}'))
        .collect();

    match env.var(&name) {
        Some(resolved) => {
            log::trace!("Substituted environment variable {}", name);
            resolved
        }
        None => {
            log::debug!(
                "Environment variable {} is not set, substituting empty string",
                name
            );
            String::new()
        }
    }
}
