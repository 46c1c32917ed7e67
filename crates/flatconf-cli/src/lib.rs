//! flatconf CLI library
//!
//! Exposes the CLI entry point so the `flatconf` binary stays a one-liner.

mod cli;

pub use cli::run;
