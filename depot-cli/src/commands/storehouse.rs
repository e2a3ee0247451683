//! Storehouse commands: `storehouse add` and `storehouse list`.

use clap::{Args, Subcommand};
use depot::{Coordinate, Database, Storehouse};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, write_listing, GlobalOptions, TableFormat};

const COLUMN_HEADERS: [&str; 6] = ["id", "name", "latitude", "longitude", "items", "units"];

/// Manage storehouses.
#[derive(Args)]
pub struct StorehouseCommand {
    #[command(subcommand)]
    pub action: StorehouseAction,
}

/// Storehouse actions.
#[derive(Subcommand)]
pub enum StorehouseAction {
    /// Add a storehouse or move an existing one
    Add(AddStorehouse),

    /// List storehouses with their stock totals
    List(ListStorehouses),
}

/// Add or update a storehouse. Stock is left untouched.
#[derive(Args)]
pub struct AddStorehouse {
    /// Storehouse identifier
    #[arg(long)]
    pub id: String,

    /// Display name (defaults to the id)
    #[arg(long)]
    pub name: Option<String>,

    /// Latitude in degrees, -90 to 90
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude in degrees, -180 to 180
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,
}

/// List storehouses.
#[derive(Args)]
pub struct ListStorehouses {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: TableFormat,
}

impl StorehouseCommand {
    /// Execute the storehouse command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        match self.action {
            StorehouseAction::Add(add) => {
                let location = Coordinate::checked(add.latitude, add.longitude)?;
                let name = add.name.unwrap_or_else(|| add.id.clone());
                let storehouse = Storehouse::new(add.id, name, location);
                Database::upsert_storehouse(db.connection(), &storehouse)?;
                if !global.quiet {
                    println!("Stored storehouse {} at {}", storehouse.id, location);
                }
            }
            StorehouseAction::List(list) => {
                let storehouses = Database::list_storehouses(db.connection())?;
                let rows: Vec<Vec<String>> = storehouses
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.name.clone(),
                            s.location.latitude.to_string(),
                            s.location.longitude.to_string(),
                            s.stock.len().to_string(),
                            s.total_units().to_string(),
                        ]
                    })
                    .collect();
                write_listing(list.format, &COLUMN_HEADERS, &rows, &storehouses)?;
            }
        }

        Ok(())
    }
}
