#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # depot
//!
//! A library for reserving stock held across geographically spread
//! storehouses.
//!
//! Requests name items and counts, optionally pinned to a storehouse. The
//! allocator fills unpinned entries from the nearest storehouses first,
//! the cost model prices the result by distance and item mass or volume,
//! and reservations can later be released in whole or in part.
//!
//! ## Core Types
//!
//! - [`Coordinate`]: Geographic position with great-circle distance
//! - [`Item`], [`Storehouse`] and [`Inventory`]: What is stocked where
//! - [`Allocator`] and [`Allocation`]: Turning requests into reservations
//! - [`Reservation`]: Allocated entries plus the release lifecycle
//! - [`CostModel`]: Transport cost of a reservation
//! - [`Database`]: `SQLite` persistence; [`ReservePlan`] and
//!   [`ReleasePlan`] drive it transactionally
//! - [`Error`], [`Violation`] and [`Result`]: Error handling types
//!
//! ## Examples
//!
//! ```
//! use depot::{Catalog, Coordinate, CostModel, Inventory, Item, Reservation, ReserveEntry,
//!     ReserveRequest, Size, Storehouse};
//!
//! let crate_item = Item::new("crate", "Crate", Size::new(1.0, 1.0, 1.0), 20.0);
//! let inventory: Inventory = [
//!     Storehouse::new("north", "North", Coordinate::new(60.0, 60.0))
//!         .with_stock(crate_item.clone(), 4),
//!     Storehouse::new("south", "South", Coordinate::new(50.0, 50.0))
//!         .with_stock(crate_item.clone(), 2),
//! ]
//! .into_iter()
//! .collect();
//!
//! let request = ReserveRequest::new(
//!     Coordinate::new(45.0, 45.0),
//!     vec![ReserveEntry::unsourced("crate", 3)],
//! );
//!
//! let allocation = Reservation::from_request(&request, &inventory);
//! assert!(allocation.is_complete());
//!
//! // The nearer storehouse is drained first.
//! let entries = allocation.reservation.entries();
//! assert_eq!(entries[0].storehouse.as_str(), "south");
//! assert_eq!(entries[0].count, 2);
//! assert_eq!(entries[1].count, 1);
//!
//! let catalog: Catalog = [(crate_item.id.clone(), crate_item)].into_iter().collect();
//! let report = CostModel::default().total_cost(&allocation.reservation, &inventory, &catalog);
//! assert!(report.total > 2000.0);
//! ```

pub mod allocator;
pub mod config;
pub mod cost;
pub mod database;
pub mod error;
pub mod geo;
pub mod inventory;
pub mod item;
pub mod logging;
pub mod operations;
pub mod reservation;

#[cfg(test)]
mod fixtures;

// Re-export key types at crate root for convenience
pub use allocator::{Allocation, Allocator, NearestFirst, StorehouseRanking};
pub use config::{Config, ConfigBuilder};
pub use cost::{CostModel, CostReport};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result, Violation, ViolationKind, Violations};
pub use geo::{distance, Coordinate};
pub use inventory::{Inventory, StockEntry, Storehouse, StorehouseId};
pub use item::{Catalog, Item, ItemId, Size};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    quote, unreserved_stock, ExecutionResult, OperationPlan, PlanAction, PlanExecutor,
    PlanOutcome, ReleaseOptions, ReleasePlan, ReserveOptions, ReservePlan,
};
pub use reservation::{
    Effect, Reservation, ReservationEntry, ReservationId, ReservationState, ReserveEntry,
    ReserveRequest,
};
