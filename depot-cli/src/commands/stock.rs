//! Stock command: `stock set`.

use clap::{Args, Subcommand};
use depot::{Database, ItemId, StorehouseId};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Manage stock levels.
#[derive(Args)]
pub struct StockCommand {
    #[command(subcommand)]
    pub action: StockAction,
}

/// Stock actions.
#[derive(Subcommand)]
pub enum StockAction {
    /// Set the unreserved count of one item in one storehouse
    Set(SetStock),
}

/// Set a stock level. A count of 0 removes the entry.
#[derive(Args)]
pub struct SetStock {
    /// Storehouse identifier
    #[arg(long)]
    pub storehouse: String,

    /// Item identifier
    #[arg(long)]
    pub item: String,

    /// Units on hand
    #[arg(long)]
    pub count: u32,
}

impl StockCommand {
    /// Execute the stock command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let StockAction::Set(set) = self.action;
        let storehouse = StorehouseId::new(set.storehouse);
        let item = ItemId::new(set.item);

        let tx = db.begin_transaction()?;
        Database::set_stock(&tx, &storehouse, &item, set.count)?;
        tx.commit().map_err(depot::Error::from)?;

        if !global.quiet {
            if set.count == 0 {
                println!("Removed {item} from {storehouse}");
            } else {
                println!("Set {item} in {storehouse} to {}", set.count);
            }
        }
        Ok(())
    }
}
