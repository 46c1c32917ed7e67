//! flatconf CLI - inspect flattened configuration files
//!
//! Usage:
//!   flatconf get config.yaml database.port --type int
//!   flatconf dump config.json --format json
//!   flatconf check config.yaml other.json

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use flatconf_core::Config;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// flatconf - Flattened JSON/YAML configuration inspector
#[derive(Parser, Debug)]
#[command(name = "flatconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a single value, converted to the requested type
    Get {
        /// Configuration file (.json, .yml or .yaml)
        file: PathBuf,

        /// Dotted path to the value (e.g., database.host or servers.0)
        path: String,

        /// Type to convert the value to
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,

        /// Value to print if the key is not found
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Print every flattened entry, sorted by key
    Dump {
        /// Configuration file (.json, .yml or .yaml)
        file: PathBuf,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check that configuration files load
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Requested accessor type
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ValueKind {
    String,
    Float,
    Int,
    Bool,
    Duration,
    StringArray,
    FloatArray,
    IntArray,
    BoolArray,
    DurationArray,
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            file,
            path,
            kind,
            default,
        } => cmd_get(&file, &path, kind, default),
        Commands::Dump { file, format } => cmd_dump(&file, &format),
        Commands::Check { files } => cmd_check(files),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    // A logger may already be installed when run() is embedded
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn load_config(file: &Path) -> Result<Config, String> {
    Config::load(file).map_err(|e| format!("Failed to load {}: {}", file.display(), e))
}

fn format_duration(d: Duration) -> String {
    humantime::format_duration(d).to_string()
}

/// Render the value at `path` as output lines; arrays produce one line per element
fn render(config: &Config, path: &str, kind: ValueKind) -> Vec<String> {
    match kind {
        ValueKind::String => vec![config.get_string(path)],
        ValueKind::Float => vec![config.get_float(path).to_string()],
        ValueKind::Int => vec![config.get_int(path).to_string()],
        ValueKind::Bool => vec![config.get_bool(path).to_string()],
        ValueKind::Duration => vec![format_duration(config.get_duration(path))],
        ValueKind::StringArray => config.get_string_array(path),
        ValueKind::FloatArray => config
            .get_float_array(path)
            .iter()
            .map(ToString::to_string)
            .collect(),
        ValueKind::IntArray => config
            .get_int_array(path)
            .iter()
            .map(ToString::to_string)
            .collect(),
        ValueKind::BoolArray => config
            .get_bool_array(path)
            .iter()
            .map(ToString::to_string)
            .collect(),
        ValueKind::DurationArray => config
            .get_duration_array(path)
            .into_iter()
            .map(format_duration)
            .collect(),
    }
}

fn render_dump(config: &Config, format: &str) -> Result<String, String> {
    let sorted: BTreeMap<_, _> = config.iter().collect();
    match format {
        "json" => serde_json::to_string_pretty(&sorted).map_err(|e| e.to_string()),
        "text" => Ok(sorted
            .iter()
            .map(|(key, value)| format!("{} = {}", key, value))
            .collect::<Vec<_>>()
            .join("\n")),
        other => Err(format!("Unsupported format: {}. Use text or json.", other)),
    }
}

fn cmd_get(file: &Path, path: &str, kind: ValueKind, default: Option<String>) -> ExitCode {
    let config = match load_config(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    if !config.contains(path) {
        return match default {
            Some(default_val) => {
                println!("{}", default_val);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("{}: Path '{}' not found", "Error".red(), path);
                ExitCode::from(1)
            }
        };
    }

    for line in render(&config, path, kind) {
        println!("{}", line);
    }
    ExitCode::SUCCESS
}

fn cmd_dump(file: &Path, format: &str) -> ExitCode {
    let config = match load_config(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match render_dump(&config, format) {
        Ok(content) => {
            if !content.is_empty() {
                println!("{}", content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        log::debug!("Checking {}", file.display());
        match Config::load(&file) {
            Ok(config) => {
                println!(
                    "{} {}: {} entries",
                    "✓".green(),
                    file.display(),
                    config.len()
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
