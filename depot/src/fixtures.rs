//! Shared domain fixtures for unit tests.
//!
//! Two storehouses, `a` at (50, 50) and `b` at (60, 60), stocked from a
//! catalog of eight items whose sizes and weights grow with their id.

use crate::geo::Coordinate;
use crate::inventory::{Inventory, Storehouse};
use crate::item::{Catalog, Item, ItemId, Size};
use crate::reservation::{ReservationEntry, ReserveEntry, ReserveRequest};

/// Item `n` (1-based) measures n x (n+1) x (n+2) meters and weighs n kg.
#[allow(clippy::cast_precision_loss)]
pub fn item(n: u32) -> Item {
    let base = f64::from(n);
    Item::new(
        n.to_string(),
        n.to_string(),
        Size::new(base, base + 1.0, base + 2.0),
        base,
    )
}

pub fn catalog() -> Catalog {
    (1..=8).map(|n| (ItemId::from(n.to_string()), item(n))).collect()
}

pub fn storehouse_a() -> Storehouse {
    Storehouse::new("a", "a", Coordinate::new(50.0, 50.0))
        .with_stock(item(1), 2)
        .with_stock(item(3), 7)
        .with_stock(item(5), 1)
        .with_stock(item(6), 6)
        .with_stock(item(8), 3)
}

pub fn storehouse_b() -> Storehouse {
    Storehouse::new("b", "b", Coordinate::new(60.0, 60.0))
        .with_stock(item(5), 1)
        .with_stock(item(7), 6)
        .with_stock(item(8), 3)
}

pub fn inventory() -> Inventory {
    [storehouse_a(), storehouse_b()].into_iter().collect()
}

/// One entry for every interesting allocation outcome.
pub fn mixed_request() -> ReserveRequest {
    ReserveRequest::new(
        Coordinate::new(40.0, 40.0),
        vec![
            // Pinned, too few units.
            ReserveEntry::sourced("1", 5, "a"),
            // Pinned, item not stocked there.
            ReserveEntry::sourced("2", 5, "a"),
            // Pinned, enough units.
            ReserveEntry::sourced("3", 5, "a"),
            // Stocked nowhere.
            ReserveEntry::unsourced("4", 5),
            // Too few units across all storehouses.
            ReserveEntry::unsourced("5", 5),
            // Enough at the nearest storehouse.
            ReserveEntry::unsourced("6", 5),
            // Enough only at the farther storehouse.
            ReserveEntry::unsourced("7", 5),
            // Enough only across both storehouses.
            ReserveEntry::unsourced("8", 5),
            // Pinned to a storehouse that does not exist.
            ReserveEntry::sourced("9", 5, "A"),
        ],
    )
}

pub fn mixed_request_entries() -> Vec<ReservationEntry> {
    vec![
        ReservationEntry::new("3", 5, "a"),
        ReservationEntry::new("5", 1, "a"),
        ReservationEntry::new("5", 1, "b"),
        ReservationEntry::new("6", 5, "a"),
        ReservationEntry::new("7", 5, "b"),
        ReservationEntry::new("8", 3, "a"),
        ReservationEntry::new("8", 2, "b"),
    ]
}
