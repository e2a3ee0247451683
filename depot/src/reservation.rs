//! Reservation types and lifecycle.
//!
//! A [`ReserveRequest`] names what a caller wants; the allocator turns it
//! into a [`Reservation`] whose entries are all pinned to a storehouse.
//! This module also applies a reservation to an inventory snapshot in
//! either direction and shrinks a reservation on partial release.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocator::{Allocation, Allocator};
use crate::error::{Error, Result, Violation};
use crate::geo::Coordinate;
use crate::inventory::{Inventory, StockEntry, StorehouseId};
use crate::item::{Catalog, ItemId};

/// Globally unique reservation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Generates a fresh, time-ordered identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReservationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One line of a reserve request.
///
/// Without a source storehouse the allocator picks storehouses itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveEntry {
    /// Requested item.
    pub item: ItemId,
    /// Requested units.
    pub count: u32,
    /// Storehouse the units must come from, if pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<StorehouseId>,
}

impl ReserveEntry {
    /// Creates an entry the allocator may fill from any storehouse.
    #[must_use]
    pub fn unsourced(item: impl Into<ItemId>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            source: None,
        }
    }

    /// Creates an entry pinned to one storehouse.
    #[must_use]
    pub fn sourced(
        item: impl Into<ItemId>,
        count: u32,
        storehouse: impl Into<StorehouseId>,
    ) -> Self {
        Self {
            item: item.into(),
            count,
            source: Some(storehouse.into()),
        }
    }

    /// The pinned storehouse. An empty id counts as unsourced.
    #[must_use]
    pub fn source(&self) -> Option<&StorehouseId> {
        self.source.as_ref().filter(|id| !id.is_empty())
    }
}

/// Request to reserve items for delivery to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveRequest {
    /// Delivery destination.
    pub destination: Coordinate,
    /// Requested entries, in request order.
    pub entries: Vec<ReserveEntry>,
}

impl ReserveRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(destination: Coordinate, entries: Vec<ReserveEntry>) -> Self {
        Self {
            destination,
            entries,
        }
    }

    /// Checks the caller contract: a valid destination and at least one
    /// entry, each with a non-empty item id and a positive count.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.destination.validate()?;
        if self.entries.is_empty() {
            return Err(Error::Validation {
                field: "entries".into(),
                message: "at least one entry is required".into(),
            });
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.item.is_empty() {
                return Err(Error::Validation {
                    field: format!("entries[{i}].item"),
                    message: "item id cannot be empty".into(),
                });
            }
            if entry.count == 0 {
                return Err(Error::Validation {
                    field: format!("entries[{i}].count"),
                    message: "count must be positive".into(),
                });
            }
        }
        Ok(())
    }
}

/// Units of one item taken from one storehouse.
///
/// Reservations hold these; releases name them too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationEntry {
    /// Reserved item.
    pub item: ItemId,
    /// Reserved units.
    pub count: u32,
    /// Storehouse the units come from.
    pub storehouse: StorehouseId,
}

impl ReservationEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(item: impl Into<ItemId>, count: u32, storehouse: impl Into<StorehouseId>) -> Self {
        Self {
            item: item.into(),
            count,
            storehouse: storehouse.into(),
        }
    }

    fn key(&self) -> (ItemId, StorehouseId) {
        (self.item.clone(), self.storehouse.clone())
    }
}

/// Direction in which a reservation is applied to inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Take reserved units out of stock.
    Reserve,
    /// Put reserved units back into stock.
    Release,
}

/// Where a reservation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    /// Entries remain and nothing was released yet.
    Active,
    /// Some units were released and some remain.
    PartiallyReleased,
    /// No entries remain; the reservation should be deleted.
    Empty,
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::PartiallyReleased => write!(f, "partially released"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// A materialized allocation.
///
/// Entries may repeat an (item, storehouse) pair; cost and release treat
/// repeated entries separately rather than merging them.
///
/// # Examples
///
/// ```
/// use depot::{Coordinate, Reservation, ReservationEntry, ReservationState};
///
/// let reservation = Reservation::builder(Coordinate::new(40.0, 40.0))
///     .entry(ReservationEntry::new("3", 5, "a"))
///     .build()
///     .unwrap();
///
/// assert_eq!(reservation.entries().len(), 1);
/// assert_eq!(reservation.state(), ReservationState::Active);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    destination: Coordinate,
    entries: Vec<ReservationEntry>,
    #[serde(default)]
    released_units: u64,
}

impl Reservation {
    /// Starts building a reservation for a destination.
    #[must_use]
    pub fn builder(destination: Coordinate) -> ReservationBuilder {
        ReservationBuilder::new(destination)
    }

    /// Assembles a fresh reservation from allocator output.
    pub(crate) fn from_parts(destination: Coordinate, entries: Vec<ReservationEntry>) -> Self {
        Self {
            id: ReservationId::generate(),
            destination,
            entries,
            released_units: 0,
        }
    }

    /// Allocates a request against an inventory with the default
    /// nearest-first allocator.
    #[must_use]
    pub fn from_request(request: &ReserveRequest, inventory: &Inventory) -> Allocation {
        Allocator::default().build_reservation(request, inventory)
    }

    /// The reservation id.
    #[must_use]
    pub const fn id(&self) -> &ReservationId {
        &self.id
    }

    /// The delivery destination.
    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Entries in allocation order.
    #[must_use]
    pub fn entries(&self) -> &[ReservationEntry] {
        &self.entries
    }

    /// Units released from this reservation so far.
    #[must_use]
    pub const fn released_units(&self) -> u64 {
        self.released_units
    }

    /// Units still held across all entries.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReservationState {
        if self.entries.is_empty() {
            ReservationState::Empty
        } else if self.released_units > 0 {
            ReservationState::PartiallyReleased
        } else {
            ReservationState::Active
        }
    }

    /// Applies this reservation to a copy of `inventory`.
    ///
    /// `Reserve` takes units out of stock and fails on a missing stock entry
    /// or insufficient units. `Release` puts units back, recreating a missing
    /// stock entry from `catalog`; an item the catalog does not know is
    /// skipped with a warning. Stock entries that reach zero are removed.
    ///
    /// The first violation aborts the call and the copy is discarded.
    ///
    /// # Errors
    ///
    /// - [`Violation::UnknownStorehouse`] if an entry's storehouse is missing
    /// - [`Violation::UnknownItem`] if a reserved item is not stocked
    /// - [`Violation::NotEnoughItemsInStorehouse`] if stock runs short
    /// - [`Violation::StockOverflow`] if a returned count does not fit
    pub fn apply_effect(
        &self,
        inventory: &Inventory,
        effect: Effect,
        catalog: &Catalog,
    ) -> std::result::Result<Inventory, Violation> {
        let mut updated = inventory.snapshot();

        for entry in &self.entries {
            let storehouse =
                updated
                    .get_mut(&entry.storehouse)
                    .ok_or_else(|| Violation::UnknownStorehouse {
                        storehouse: entry.storehouse.clone(),
                    })?;

            match effect {
                Effect::Reserve => {
                    let stock = storehouse.stock.get_mut(&entry.item).ok_or_else(|| {
                        Violation::UnknownItem {
                            item: entry.item.clone(),
                        }
                    })?;
                    if stock.count < entry.count {
                        return Err(Violation::NotEnoughItemsInStorehouse {
                            storehouse: entry.storehouse.clone(),
                            item: entry.item.clone(),
                            requested: entry.count,
                            available: stock.count,
                        });
                    }
                    stock.count -= entry.count;
                }
                Effect::Release => {
                    if let Some(stock) = storehouse.stock.get_mut(&entry.item) {
                        let on_hand = stock.count;
                        stock.count = on_hand.checked_add(entry.count).ok_or_else(|| {
                            Violation::StockOverflow {
                                storehouse: entry.storehouse.clone(),
                                item: entry.item.clone(),
                                available: on_hand,
                                returned: entry.count,
                            }
                        })?;
                    } else if let Some(item) = catalog.get(&entry.item) {
                        storehouse.stock.insert(
                            entry.item.clone(),
                            StockEntry::new(item.clone(), entry.count),
                        );
                    } else {
                        log::warn!(
                            "releasing {} x {} to storehouse {}: item is not in the catalog, skipped",
                            entry.count,
                            entry.item,
                            entry.storehouse
                        );
                    }
                }
            }

            if storehouse
                .stock
                .get(&entry.item)
                .is_some_and(|stock| stock.count == 0)
            {
                storehouse.stock.remove(&entry.item);
            }
        }

        Ok(updated)
    }

    /// Removes released units from this reservation.
    ///
    /// Release items are matched to entries by (item, storehouse); repeated
    /// release items for one pair are summed and zero counts are ignored.
    /// Each pair is taken from the first entry that carries it. Entries that
    /// reach zero are dropped.
    ///
    /// Every release item is checked before anything changes: on error the
    /// reservation is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`Violation::NotEnoughItemsInReservation`] if the matching entry
    ///   holds fewer units than requested
    /// - [`Violation::InvalidReleaseItems`] listing every pair that matched
    ///   no entry
    pub fn release(&mut self, items: &[ReservationEntry]) -> std::result::Result<(), Violation> {
        let mut order: Vec<(ItemId, StorehouseId)> = Vec::new();
        let mut pending: HashMap<(ItemId, StorehouseId), u32> = HashMap::new();
        for item in items.iter().filter(|item| item.count > 0) {
            let key = item.key();
            let requested = pending.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                0
            });
            *requested = requested.saturating_add(item.count);
        }

        let mut entries = self.entries.clone();
        let mut released: u64 = 0;
        for entry in &mut entries {
            let Some(requested) = pending.remove(&entry.key()) else {
                continue;
            };
            if entry.count < requested {
                return Err(Violation::NotEnoughItemsInReservation {
                    storehouse: entry.storehouse.clone(),
                    item: entry.item.clone(),
                    reserved: entry.count,
                    requested,
                });
            }
            entry.count -= requested;
            released += u64::from(requested);
        }

        if !pending.is_empty() {
            let pairs = order
                .into_iter()
                .filter(|key| pending.contains_key(key))
                .collect();
            return Err(Violation::InvalidReleaseItems { pairs });
        }

        entries.retain(|entry| entry.count > 0);
        self.entries = entries;
        self.released_units += released;
        Ok(())
    }
}

/// Builder for [`Reservation`].
#[derive(Debug, Clone)]
pub struct ReservationBuilder {
    id: Option<ReservationId>,
    destination: Coordinate,
    entries: Vec<ReservationEntry>,
    released_units: u64,
}

impl ReservationBuilder {
    fn new(destination: Coordinate) -> Self {
        Self {
            id: None,
            destination,
            entries: Vec::new(),
            released_units: 0,
        }
    }

    /// Uses an existing id instead of generating one.
    #[must_use]
    pub fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Appends an entry.
    #[must_use]
    pub fn entry(mut self, entry: ReservationEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Appends several entries.
    #[must_use]
    pub fn entries(mut self, entries: impl IntoIterator<Item = ReservationEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Sets the count of units already released.
    #[must_use]
    pub const fn released_units(mut self, released_units: u64) -> Self {
        self.released_units = released_units;
        self
    }

    /// Builds the reservation, generating an id if none was given.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any entry has a zero count or an empty
    /// item or storehouse id.
    pub fn build(self) -> Result<Reservation> {
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.item.is_empty() || entry.storehouse.is_empty() {
                return Err(Error::Validation {
                    field: format!("entries[{i}]"),
                    message: "reservation entries need an item and a storehouse".into(),
                });
            }
            if entry.count == 0 {
                return Err(Error::Validation {
                    field: format!("entries[{i}].count"),
                    message: "count must be positive".into(),
                });
            }
        }

        Ok(Reservation {
            id: self.id.unwrap_or_else(ReservationId::generate),
            destination: self.destination,
            entries: self.entries,
            released_units: self.released_units,
        })
    }
}

#[cfg(test)]
mod proptests;
