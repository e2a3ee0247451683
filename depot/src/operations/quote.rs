//! Pricing of stored reservations.

use rusqlite::Connection;

use crate::cost::{CostModel, CostReport};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId};

/// A stored reservation with its current transport cost.
#[derive(Debug, Clone)]
pub struct Quote {
    /// The reservation as stored.
    pub reservation: Reservation,
    /// Cost against the current storehouses and catalog.
    pub report: CostReport,
}

/// Prices a stored reservation against the current inventory and catalog.
///
/// Storehouses or items that disappeared since the reservation was made
/// are reported in `report.violations`; the total covers the rest.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the reservation does not exist, or a
/// database error if the snapshot cannot be read.
pub fn quote(conn: &Connection, id: &ReservationId, model: &CostModel) -> Result<Quote> {
    let reservation = Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
        resource: format!("reservation {id}"),
    })?;
    let inventory = Database::load_inventory(conn)?;
    let catalog = Database::load_catalog(conn)?;

    let report = model.total_cost(&reservation, &inventory, &catalog);
    Ok(Quote {
        reservation,
        report,
    })
}
