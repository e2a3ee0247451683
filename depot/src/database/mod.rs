//! Database layer for persistent storage of the catalog, storehouse stock
//! and reservations.
//!
//! The layer is a thin `SQLite` mapping. Domain rules live in the pure
//! modules; services in [`crate::operations`] load a snapshot, compute, and
//! write the result back inside one [`Database::begin_transaction`].
//!
//! # Examples
//!
//! ```no_run
//! use depot::database::{Database, DatabaseConfig};
//! use depot::{Coordinate, Item, Size, Storehouse};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/depot.db")).unwrap();
//!
//! let tx = db.begin_transaction().unwrap();
//! let bolt = Item::new("bolt", "Bolt", Size::new(0.01, 0.01, 0.05), 0.02);
//! Database::upsert_item(&tx, &bolt).unwrap();
//! let north = Storehouse::new("north", "North", Coordinate::new(60.0, 25.0));
//! Database::upsert_storehouse(&tx, &north).unwrap();
//! Database::set_stock(&tx, &north.id, &bolt.id, 500).unwrap();
//! tx.commit().unwrap();
//!
//! let inventory = Database::load_inventory(db.connection()).unwrap();
//! assert_eq!(inventory.available(&"north".into(), &"bolt".into()), 500);
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use operations::ReservationSummary;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
