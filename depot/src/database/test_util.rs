//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::fixtures;
use crate::inventory::Inventory;
use crate::item::Catalog;

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Stores a catalog and the storehouses of an inventory, stock included.
///
/// # Panics
///
/// Panics if any write fails.
pub fn seed(db: &Database, catalog: &Catalog, inventory: &Inventory) {
    let conn = db.connection();
    for item in catalog.values() {
        Database::upsert_item(conn, item).unwrap();
    }
    for storehouse in inventory.iter() {
        Database::upsert_storehouse(conn, storehouse).unwrap();
        Database::replace_stock(conn, storehouse).unwrap();
    }
}

/// Stores the shared fixture catalog and storehouses `a` and `b`.
///
/// # Panics
///
/// Panics if any write fails.
pub fn seed_fixtures(db: &Database) {
    seed(db, &fixtures::catalog(), &fixtures::inventory());
}
