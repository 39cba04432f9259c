//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Level;
use std::path::PathBuf;

/// slog-router - route log records to sinks by severity
#[derive(Parser, Debug)]
#[command(
    name = "slog-router",
    author,
    version,
    about = "Severity-based log record router",
    long_about = "Routes log records to two groups of sinks.\n\n\
                  Records below ERROR go to the standard sinks, ERROR and above \n\
                  go to the error sinks. Sinks and routes come from a TOML or JSON file."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SLOG_ROUTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic log format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "SLOG_ROUTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a single record
    Emit(EmitArgs),

    /// Route records read line by line from stdin
    Pipe(PipeArgs),

    /// Validate configuration file without routing anything
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "router.toml", env = "SLOG_ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Record level
    #[arg(short, long, default_value = "info")]
    pub level: Level,

    /// Record message
    #[arg(short, long)]
    pub message: String,

    /// Record attribute as key=value (repeatable)
    #[arg(short, long = "attr", value_parser = parse_key_value)]
    pub attrs: Vec<(String, String)>,

    /// Scope to open before emitting
    #[arg(short, long)]
    pub scope: Option<String>,
}

/// Arguments for the `pipe` command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "router.toml", env = "SLOG_ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Level for lines that carry none
    #[arg(long, default_value = "info")]
    pub default_level: Level,

    /// Stop after the first line that fails to route
    #[arg(long)]
    pub fail_fast: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SLOG_ROUTER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "router.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "router.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show sink parameters
    #[arg(long)]
    pub params: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

/// Parse `key=value`; the value may itself contain `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
