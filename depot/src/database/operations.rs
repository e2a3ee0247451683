//! CRUD operations for items, storehouses, stock and reservations.
//!
//! Every function takes a plain [`Connection`] so it can run on its own or
//! inside a transaction from [`Database::begin_transaction`] (which derefs
//! to a connection). None of them open a transaction themselves.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::inventory::{Inventory, StockEntry, Storehouse, StorehouseId};
use crate::item::{Catalog, Item, ItemId, Size};
use crate::reservation::{Reservation, ReservationEntry, ReservationId};

use super::connection::Database;

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// One row of [`Database::list_reservations`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationSummary {
    /// Reservation id.
    pub id: ReservationId,
    /// Delivery destination.
    pub destination: Coordinate,
    /// Number of entries still held.
    pub entries: usize,
    /// Units still held across all entries.
    pub total_units: u64,
    /// Units released so far.
    pub released_units: u64,
    /// When the reservation was created.
    pub created_at: SystemTime,
    /// When the reservation last changed.
    pub updated_at: SystemTime,
}

const UPSERT_ITEM: &str = r"
    INSERT INTO items (id, name, length_meters, width_meters, height_meters, weight_kg)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        length_meters = excluded.length_meters,
        width_meters = excluded.width_meters,
        height_meters = excluded.height_meters,
        weight_kg = excluded.weight_kg
";

const SELECT_ITEM: &str = r"
    SELECT id, name, length_meters, width_meters, height_meters, weight_kg
    FROM items
    WHERE id = ?
";

const LIST_ITEMS: &str = r"
    SELECT id, name, length_meters, width_meters, height_meters, weight_kg
    FROM items
    ORDER BY id
";

const UPSERT_STOREHOUSE: &str = r"
    INSERT INTO storehouses (id, name, latitude, longitude)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        latitude = excluded.latitude,
        longitude = excluded.longitude
";

const SELECT_STOREHOUSE: &str = r"
    SELECT id, name, latitude, longitude
    FROM storehouses
    WHERE id = ?
";

const LIST_STOREHOUSES: &str = r"
    SELECT id, name, latitude, longitude
    FROM storehouses
    ORDER BY id
";

const SELECT_STOCK: &str = r"
    SELECT si.storehouse_id, si.items_count,
           i.id, i.name, i.length_meters, i.width_meters, i.height_meters, i.weight_kg
    FROM storehouse_items si
    JOIN items i ON i.id = si.item_id
";

const SELECT_STOCK_FOR_STOREHOUSE: &str = r"
    SELECT si.storehouse_id, si.items_count,
           i.id, i.name, i.length_meters, i.width_meters, i.height_meters, i.weight_kg
    FROM storehouse_items si
    JOIN items i ON i.id = si.item_id
    WHERE si.storehouse_id = ?
";

const UPSERT_STOCK: &str = r"
    INSERT INTO storehouse_items (storehouse_id, item_id, items_count)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(storehouse_id, item_id) DO UPDATE SET items_count = excluded.items_count
";

const DELETE_STOCK: &str = "DELETE FROM storehouse_items WHERE storehouse_id = ? AND item_id = ?";

const DELETE_ALL_STOCK: &str = "DELETE FROM storehouse_items WHERE storehouse_id = ?";

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (id, destination_latitude, destination_longitude, released_units, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
";

const UPDATE_RESERVATION: &str = r"
    UPDATE reservations
    SET destination_latitude = ?2, destination_longitude = ?3, released_units = ?4, updated_at = ?5
    WHERE id = ?1
";

const DELETE_RESERVATION: &str = "DELETE FROM reservations WHERE id = ?";

const SELECT_RESERVATION: &str = r"
    SELECT destination_latitude, destination_longitude, released_units
    FROM reservations
    WHERE id = ?
";

const INSERT_RESERVATION_ITEM: &str = r"
    INSERT INTO reservation_items (reservation_id, position, item_id, storehouse_id, items_count)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

const DELETE_RESERVATION_ITEMS: &str = "DELETE FROM reservation_items WHERE reservation_id = ?";

const SELECT_RESERVATION_ITEMS: &str = r"
    SELECT item_id, storehouse_id, items_count
    FROM reservation_items
    WHERE reservation_id = ?
    ORDER BY position
";

const LIST_RESERVATIONS: &str = r"
    SELECT r.id, r.destination_latitude, r.destination_longitude, r.released_units,
           r.created_at, r.updated_at,
           COUNT(ri.position), COALESCE(SUM(ri.items_count), 0)
    FROM reservations r
    LEFT JOIN reservation_items ri ON ri.reservation_id = r.id
    GROUP BY r.id
    ORDER BY r.created_at, r.id
";

/// Expects: id, name, length, width, height, weight.
fn row_to_item(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Item> {
    let id: String = row.get(offset)?;
    let name: String = row.get(offset + 1)?;
    let size = Size::new(
        row.get(offset + 2)?,
        row.get(offset + 3)?,
        row.get(offset + 4)?,
    );
    let weight: f64 = row.get(offset + 5)?;
    Ok(Item::new(id, name, size, weight))
}

/// Expects: id, name, latitude, longitude.
fn row_to_storehouse(row: &rusqlite::Row<'_>) -> rusqlite::Result<Storehouse> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let location = Coordinate::new(row.get(2)?, row.get(3)?);
    Ok(Storehouse::new(id, name, location))
}

/// Expects: `storehouse_id`, count, then the item columns.
fn row_to_stock(row: &rusqlite::Row<'_>) -> rusqlite::Result<(StorehouseId, StockEntry)> {
    let storehouse: String = row.get(0)?;
    let count: u32 = row.get(1)?;
    let item = row_to_item(row, 2)?;
    Ok((StorehouseId::new(storehouse), StockEntry::new(item, count)))
}

fn units_to_sql(units: u64) -> Result<i64> {
    i64::try_from(units).map_err(|_| Error::Validation {
        field: "released_units".into(),
        message: format!("{units} does not fit in the database"),
    })
}

fn units_from_sql(units: i64) -> Result<u64> {
    u64::try_from(units).map_err(|_| Error::DatabaseCorruption {
        details: format!("negative unit count {units}"),
    })
}

impl Database {
    // ========================================================================
    // Catalog
    // ========================================================================

    /// Creates an item or updates its name, size and weight.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid item, or a database error.
    pub fn upsert_item(conn: &Connection, item: &Item) -> Result<()> {
        item.validate()?;
        conn.execute(
            UPSERT_ITEM,
            params![
                item.id.as_str(),
                item.name,
                item.size.length_meters,
                item.size.width_meters,
                item.size.height_meters,
                item.weight_kilograms,
            ],
        )?;
        Ok(())
    }

    /// Looks up one item.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_item(conn: &Connection, id: &ItemId) -> Result<Option<Item>> {
        Ok(conn
            .query_row(SELECT_ITEM, [id.as_str()], |row| row_to_item(row, 0))
            .optional()?)
    }

    /// Lists every item ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_items(conn: &Connection) -> Result<Vec<Item>> {
        let mut stmt = conn.prepare(LIST_ITEMS)?;
        let items = stmt
            .query_map([], |row| row_to_item(row, 0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(items)
    }

    /// Loads the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
        Ok(Self::list_items(conn)?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect())
    }

    // ========================================================================
    // Storehouses and stock
    // ========================================================================

    /// Creates a storehouse or updates its name and location. Stock is left
    /// untouched; see [`Database::replace_stock`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid storehouse, or a database
    /// error.
    pub fn upsert_storehouse(conn: &Connection, storehouse: &Storehouse) -> Result<()> {
        storehouse.validate()?;
        conn.execute(
            UPSERT_STOREHOUSE,
            params![
                storehouse.id.as_str(),
                storehouse.name,
                storehouse.location.latitude,
                storehouse.location.longitude,
            ],
        )?;
        Ok(())
    }

    /// Looks up one storehouse together with its stock.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn get_storehouse(conn: &Connection, id: &StorehouseId) -> Result<Option<Storehouse>> {
        let Some(mut storehouse) = conn
            .query_row(SELECT_STOREHOUSE, [id.as_str()], row_to_storehouse)
            .optional()?
        else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(SELECT_STOCK_FOR_STOREHOUSE)?;
        for row in stmt.query_map([id.as_str()], row_to_stock)? {
            let (_, entry) = row?;
            storehouse.stock.insert(entry.item.id.clone(), entry);
        }
        Ok(Some(storehouse))
    }

    /// Loads every storehouse with its stock.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn load_inventory(conn: &Connection) -> Result<Inventory> {
        let mut stmt = conn.prepare(LIST_STOREHOUSES)?;
        let mut storehouses: HashMap<StorehouseId, Storehouse> = stmt
            .query_map([], row_to_storehouse)?
            .map(|row| row.map(|s| (s.id.clone(), s)))
            .collect::<std::result::Result<_, rusqlite::Error>>()?;

        let mut stmt = conn.prepare(SELECT_STOCK)?;
        for row in stmt.query_map([], row_to_stock)? {
            let (storehouse, entry) = row?;
            if let Some(s) = storehouses.get_mut(&storehouse) {
                s.stock.insert(entry.item.id.clone(), entry);
            }
        }

        Ok(storehouses.into_values().collect())
    }

    /// Lists every storehouse with its stock, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_storehouses(conn: &Connection) -> Result<Vec<Storehouse>> {
        let mut storehouses: Vec<Storehouse> = Self::load_inventory(conn)?.iter().cloned().collect();
        storehouses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(storehouses)
    }

    /// Sets the stock level of one item in one storehouse. Zero removes the
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the storehouse or the item does not
    /// exist, or a database error.
    pub fn set_stock(
        conn: &Connection,
        storehouse: &StorehouseId,
        item: &ItemId,
        count: u32,
    ) -> Result<()> {
        let exists: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM storehouses WHERE id = ?",
            [storehouse.as_str()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(Error::NotFound {
                resource: format!("storehouse {storehouse}"),
            });
        }
        if Self::get_item(conn, item)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("item {item}"),
            });
        }

        if count == 0 {
            conn.execute(DELETE_STOCK, params![storehouse.as_str(), item.as_str()])?;
        } else {
            conn.execute(
                UPSERT_STOCK,
                params![storehouse.as_str(), item.as_str(), count],
            )?;
        }
        Ok(())
    }

    /// Overwrites the stored stock of a storehouse with its in-memory stock.
    /// Zero-count entries are not written.
    ///
    /// # Errors
    ///
    /// Returns a database error, including a foreign key failure when a
    /// stocked item is missing from the catalog.
    pub fn replace_stock(conn: &Connection, storehouse: &Storehouse) -> Result<()> {
        conn.execute(DELETE_ALL_STOCK, [storehouse.id.as_str()])?;
        let mut stmt = conn.prepare(UPSERT_STOCK)?;
        for entry in storehouse.sorted_stock() {
            if entry.count > 0 {
                stmt.execute(params![
                    storehouse.id.as_str(),
                    entry.item.id.as_str(),
                    entry.count
                ])?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    fn write_reservation_items(conn: &Connection, reservation: &Reservation) -> Result<()> {
        let mut stmt = conn.prepare(INSERT_RESERVATION_ITEM)?;
        for (position, entry) in reservation.entries().iter().enumerate() {
            #[allow(clippy::cast_possible_wrap)]
            let position = position as i64;
            stmt.execute(params![
                reservation.id().as_str(),
                position,
                entry.item.as_str(),
                entry.storehouse.as_str(),
                entry.count,
            ])?;
        }
        Ok(())
    }

    /// Stores a new reservation with its entries.
    ///
    /// # Errors
    ///
    /// Returns a database error, including a constraint failure if the id
    /// is already taken.
    pub fn insert_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let destination = reservation.destination();
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.id().as_str(),
                destination.latitude,
                destination.longitude,
                units_to_sql(reservation.released_units())?,
                now,
            ],
        )?;
        Self::write_reservation_items(conn, reservation)
    }

    /// Rewrites a stored reservation's entries and released count.
    ///
    /// Returns false if no reservation with that id exists.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn update_reservation(conn: &Connection, reservation: &Reservation) -> Result<bool> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let destination = reservation.destination();
        let updated = conn.execute(
            UPDATE_RESERVATION,
            params![
                reservation.id().as_str(),
                destination.latitude,
                destination.longitude,
                units_to_sql(reservation.released_units())?,
                now,
            ],
        )?;
        if updated == 0 {
            return Ok(false);
        }

        conn.execute(DELETE_RESERVATION_ITEMS, [reservation.id().as_str()])?;
        Self::write_reservation_items(conn, reservation)?;
        Ok(true)
    }

    /// Deletes a reservation and its entries.
    ///
    /// Returns false if no reservation with that id exists.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn delete_reservation(conn: &Connection, id: &ReservationId) -> Result<bool> {
        Ok(conn.execute(DELETE_RESERVATION, [id.as_str()])? > 0)
    }

    /// Loads a reservation with its entries in allocation order.
    ///
    /// # Errors
    ///
    /// Returns a database error, or [`Error::DatabaseCorruption`] if the
    /// stored rows do not form a valid reservation.
    pub fn get_reservation(conn: &Connection, id: &ReservationId) -> Result<Option<Reservation>> {
        let Some((latitude, longitude, released)) = conn
            .query_row(SELECT_RESERVATION, [id.as_str()], |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .optional()?
        else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(SELECT_RESERVATION_ITEMS)?;
        let entries = stmt
            .query_map([id.as_str()], |row| {
                Ok(ReservationEntry::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let reservation = Reservation::builder(Coordinate::new(latitude, longitude))
            .id(id.clone())
            .entries(entries)
            .released_units(units_from_sql(released)?)
            .build()
            .map_err(|e| Error::DatabaseCorruption {
                details: format!("reservation {id}: {e}"),
            })?;
        Ok(Some(reservation))
    }

    /// Lists reservation summaries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn list_reservations(conn: &Connection) -> Result<Vec<ReservationSummary>> {
        let mut stmt = conn.prepare(LIST_RESERVATIONS)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    Coordinate::new(row.get(1)?, row.get(2)?),
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        rows.into_iter()
            .map(
                |(id, destination, released, created, updated, entries, units)| {
                    Ok(ReservationSummary {
                        id: ReservationId::new(id),
                        destination,
                        entries: usize::try_from(entries).unwrap_or_default(),
                        total_units: units_from_sql(units)?,
                        released_units: units_from_sql(released)?,
                        created_at: unix_secs_to_systemtime(created),
                        updated_at: unix_secs_to_systemtime(updated),
                    })
                },
            )
            .collect()
    }

    /// Runs `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("Integrity check failed: {result}"),
            })
        }
    }
}
