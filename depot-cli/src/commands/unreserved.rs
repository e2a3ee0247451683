//! Unreserved command implementation.

use clap::Args;
use depot::operations::unreserved_stock;
use depot::{ItemId, StorehouseId};
use serde_json::json;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, write_listing, GlobalOptions, TableFormat};

const COLUMN_HEADERS: [&str; 3] = ["item", "name", "count"];

/// Show the stock of a storehouse that is not held by any reservation.
#[derive(Args)]
pub struct UnreservedCommand {
    /// Storehouse identifier
    #[arg(long)]
    pub storehouse: String,

    /// Only show these items (repeatable)
    #[arg(long = "item", value_name = "ID")]
    pub items: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: TableFormat,
}

impl UnreservedCommand {
    /// Execute the unreserved command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let storehouse = StorehouseId::new(self.storehouse);
        let filter: Vec<ItemId> = self.items.into_iter().map(ItemId::new).collect();
        let stock = unreserved_stock(db.connection(), &storehouse, &filter)?;

        let rows: Vec<Vec<String>> = stock
            .iter()
            .map(|e| vec![e.item.id.to_string(), e.item.name.clone(), e.count.to_string()])
            .collect();
        let json_data: Vec<serde_json::Value> = stock
            .iter()
            .map(|e| json!({ "item": e.item.id, "name": e.item.name, "count": e.count }))
            .collect();

        write_listing(self.format, &COLUMN_HEADERS, &rows, &json_data)
    }
}
