//! Utility functions for CLI operations.
//!
//! This module provides the helpers shared across commands: configuration
//! loading, database opening, entry parsing and tabular output.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use clap::ValueEnum;
use depot::config::OutputFormat;
use depot::database::{resolve_data_dir, DATABASE_FILE_NAME};
use depot::{Config, ConfigBuilder, Database, DatabaseConfig, ReservationEntry, ReserveEntry};
use serde::Serialize;

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose is consumed by the logger before dispatch
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the lock wait (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum TableFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

/// Output format for reservation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text
    Human,
    /// JSON document
    Json,
}

impl ReportFormat {
    /// The explicit flag if given, else the configured default.
    pub fn resolve(flag: Option<Self>, config: &Config) -> Self {
        flag.unwrap_or(match config.output_format() {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
        })
    }
}

/// Resolve the data directory from global options.
///
/// Priority: `--data-dir` (or `DEPOT_DATA_DIR`) > `~/.depot`.
pub fn data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. Project files (`depot.local.yaml`, then `depot.yaml`)
/// 3. User config in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref dir) = global.data_dir {
        builder = builder.with_data_dir(dir);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// The lock wait comes from `--busy-timeout` if given, else from the
/// configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled by flag or configuration.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && (global.disable_autoinit || config.disable_autoinit()) {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = global
        .busy_timeout
        .map_or_else(|| config.maximum_lock_wait(), |s| Duration::from_secs(s.into()));

    log::debug!(
        "opening {} with a {}s lock wait",
        db_path.display(),
        busy_timeout.as_secs()
    );
    Database::open(DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout))
        .map_err(CliError::from)
}

fn split_count(spec: &str) -> Result<(&str, u32, Option<&str>), String> {
    let (item, rest) = spec
        .split_once(':')
        .ok_or_else(|| format!("expected ITEM:COUNT[@STOREHOUSE], got '{spec}'"))?;
    let (count, storehouse) = match rest.split_once('@') {
        Some((count, storehouse)) => (count, Some(storehouse)),
        None => (rest, None),
    };
    if item.is_empty() {
        return Err(format!("missing item id in '{spec}'"));
    }
    if storehouse.is_some_and(str::is_empty) {
        return Err(format!("missing storehouse id in '{spec}'"));
    }
    let count = count
        .parse::<u32>()
        .map_err(|e| format!("invalid count in '{spec}': {e}"))?;
    Ok((item, count, storehouse))
}

/// Parse `ITEM:COUNT` or `ITEM:COUNT@STOREHOUSE` into a request entry.
pub fn parse_reserve_entry(spec: &str) -> Result<ReserveEntry, String> {
    let (item, count, storehouse) = split_count(spec)?;
    Ok(match storehouse {
        Some(storehouse) => ReserveEntry::sourced(item, count, storehouse),
        None => ReserveEntry::unsourced(item, count),
    })
}

/// Parse `ITEM:COUNT@STOREHOUSE` into a release entry.
pub fn parse_release_entry(spec: &str) -> Result<ReservationEntry, String> {
    match split_count(spec)? {
        (item, count, Some(storehouse)) => Ok(ReservationEntry::new(item, count, storehouse)),
        (_, _, None) => Err(format!(
            "release entries need a storehouse: ITEM:COUNT@STOREHOUSE, got '{spec}'"
        )),
    }
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// Print a listing to stdout.
///
/// `rows` feed the table and delimited formats, `json` the JSON format.
pub fn write_listing<T: Serialize>(
    format: TableFormat,
    headers: &[&str],
    rows: &[Vec<String>],
    json: &T,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match format {
        TableFormat::Table => {
            let header_line = headers
                .iter()
                .map(|s| s.to_uppercase())
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(handle, "{header_line}")?;
            for row in rows {
                writeln!(handle, "{}", row.join("\t"))?;
            }
        }
        TableFormat::Json => {
            serde_json::to_writer_pretty(&mut handle, json)?;
            writeln!(handle)?;
        }
        TableFormat::Csv | TableFormat::Tsv => {
            let delimiter = if format == TableFormat::Csv { b',' } else { b'\t' };
            let mut writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(handle);
            writer.write_record(headers)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
