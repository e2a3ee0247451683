//! List command implementation.
//!
//! This module implements the `list` command, which displays reservation
//! summaries in various formats (table, JSON, CSV, TSV).

use clap::Args;
use depot::Database;
use serde_json::json;

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, open_database, write_listing, GlobalOptions,
    TableFormat,
};

/// Column headers for every format.
const COLUMN_HEADERS: [&str; 8] = [
    "id",
    "latitude",
    "longitude",
    "entries",
    "units",
    "released",
    "created_at",
    "updated_at",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: TableFormat,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let summaries = Database::list_reservations(db.connection())?;

        let rows: Vec<Vec<String>> = summaries
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.destination.latitude.to_string(),
                    s.destination.longitude.to_string(),
                    s.entries.to_string(),
                    s.total_units.to_string(),
                    s.released_units.to_string(),
                    format_timestamp(s.created_at),
                    format_timestamp(s.updated_at),
                ]
            })
            .collect();

        let json_data: Vec<serde_json::Value> = summaries
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "destination": s.destination,
                    "entries": s.entries,
                    "total_units": s.total_units,
                    "released_units": s.released_units,
                    "created_at": format_timestamp(s.created_at),
                    "updated_at": format_timestamp(s.updated_at),
                })
            })
            .collect();

        write_listing(self.format, &COLUMN_HEADERS, &rows, &json_data)
    }
}
