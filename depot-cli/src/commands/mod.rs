//! CLI command implementations.
//!
//! - `init`: Create the data directory and database
//! - `item`, `storehouse`, `stock`: Maintain the catalog and stock levels
//! - `reserve`, `release`: Reservation lifecycle
//! - `show`, `list`, `unreserved`: Inspection
//! - `completions`: Shell completion scripts

pub mod completions;
pub mod init;
pub mod item;
pub mod list;
pub mod release;
pub mod reserve;
pub mod show;
pub mod stock;
pub mod storehouse;
pub mod unreserved;

pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use item::ItemCommand;
pub use list::ListCommand;
pub use release::ReleaseCommand;
pub use reserve::ReserveCommand;
pub use show::ShowCommand;
pub use stock::StockCommand;
pub use storehouse::StorehouseCommand;
pub use unreserved::UnreservedCommand;
