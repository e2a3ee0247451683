//! Catalog commands: `item add` and `item list`.

use clap::{Args, Subcommand};
use depot::{Database, Item, Size};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, write_listing, GlobalOptions, TableFormat};

const COLUMN_HEADERS: [&str; 6] = ["id", "name", "length", "width", "height", "weight"];

/// Manage the item catalog.
#[derive(Args)]
pub struct ItemCommand {
    #[command(subcommand)]
    pub action: ItemAction,
}

/// Catalog actions.
#[derive(Subcommand)]
pub enum ItemAction {
    /// Add an item or update an existing one
    Add(AddItem),

    /// List catalog items
    List(ListItems),
}

/// Add or update a catalog item.
#[derive(Args)]
pub struct AddItem {
    /// Item identifier
    #[arg(long)]
    pub id: String,

    /// Display name (defaults to the id)
    #[arg(long)]
    pub name: Option<String>,

    /// Length in meters
    #[arg(long)]
    pub length: f64,

    /// Width in meters
    #[arg(long)]
    pub width: f64,

    /// Height in meters
    #[arg(long)]
    pub height: f64,

    /// Weight in kilograms
    #[arg(long)]
    pub weight: f64,
}

/// List catalog items.
#[derive(Args)]
pub struct ListItems {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: TableFormat,
}

impl ItemCommand {
    /// Execute the item command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        match self.action {
            ItemAction::Add(add) => {
                let name = add.name.unwrap_or_else(|| add.id.clone());
                let item = Item::new(
                    add.id,
                    name,
                    Size::new(add.length, add.width, add.height),
                    add.weight,
                );
                Database::upsert_item(db.connection(), &item)?;
                if !global.quiet {
                    println!("Stored item {}", item.id);
                }
            }
            ItemAction::List(list) => {
                let items = Database::list_items(db.connection())?;
                let rows: Vec<Vec<String>> = items
                    .iter()
                    .map(|item| {
                        vec![
                            item.id.to_string(),
                            item.name.clone(),
                            item.size.length_meters.to_string(),
                            item.size.width_meters.to_string(),
                            item.size.height_meters.to_string(),
                            item.weight_kilograms.to_string(),
                        ]
                    })
                    .collect();
                write_listing(list.format, &COLUMN_HEADERS, &rows, &items)?;
            }
        }

        Ok(())
    }
}
