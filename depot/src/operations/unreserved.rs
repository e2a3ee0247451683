//! Stock that is still free to reserve.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::inventory::{StockEntry, StorehouseId};
use crate::item::ItemId;

/// Returns a storehouse's current stock entries ordered by item id.
///
/// Reserved units are already deducted from stored stock, so every unit
/// listed here is available. A non-empty `filter` keeps only the named
/// items; named items the storehouse does not stock are left out.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the storehouse does not exist, or a
/// database error if it cannot be read.
///
/// # Examples
///
/// ```no_run
/// use depot::operations::unreserved_stock;
/// use depot::{Database, DatabaseConfig};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/depot.db")).unwrap();
/// for entry in unreserved_stock(db.connection(), &"north".into(), &[]).unwrap() {
///     println!("{}: {}", entry.item.id, entry.count);
/// }
/// ```
pub fn unreserved_stock(
    conn: &Connection,
    storehouse: &StorehouseId,
    filter: &[ItemId],
) -> Result<Vec<StockEntry>> {
    let storehouse = Database::get_storehouse(conn, storehouse)?.ok_or_else(|| Error::NotFound {
        resource: format!("storehouse {storehouse}"),
    })?;

    Ok(storehouse
        .sorted_stock()
        .into_iter()
        .filter(|entry| filter.is_empty() || filter.contains(&entry.item.id))
        .cloned()
        .collect())
}
