//! Storehouses and inventory snapshots.
//!
//! An [`Inventory`] is a value: cloning it copies every storehouse together
//! with its stock map, so a simulation can decrement counts freely without
//! touching the snapshot it started from. Settled inventories never hold a
//! zero-count stock entry; see [`Inventory::prune_empty`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::item::{Item, ItemId};

/// Opaque storehouse identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorehouseId(String);

impl StorehouseId {
    /// Creates a storehouse id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StorehouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StorehouseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StorehouseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Units of one item held by a storehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    /// The stocked item.
    pub item: Item,
    /// Units on hand.
    pub count: u32,
}

impl StockEntry {
    /// Creates a stock entry.
    #[must_use]
    pub const fn new(item: Item, count: u32) -> Self {
        Self { item, count }
    }
}

/// A physical location holding stock.
///
/// # Examples
///
/// ```
/// use depot::{Coordinate, Item, Size, Storehouse};
///
/// let widget = Item::new("w", "widget", Size::new(0.1, 0.1, 0.1), 0.2);
/// let storehouse = Storehouse::new("a", "North", Coordinate::new(50.0, 50.0))
///     .with_stock(widget, 7);
///
/// assert_eq!(storehouse.available(&"w".into()), 7);
/// assert_eq!(storehouse.available(&"missing".into()), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storehouse {
    /// Storehouse identifier.
    pub id: StorehouseId,
    /// Display name.
    pub name: String,
    /// Where the storehouse is.
    pub location: Coordinate,
    /// Stock keyed by item id.
    pub stock: HashMap<ItemId, StockEntry>,
}

impl Storehouse {
    /// Creates an empty storehouse.
    #[must_use]
    pub fn new(id: impl Into<StorehouseId>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            stock: HashMap::new(),
        }
    }

    /// Adds stock for an item, replacing any existing entry.
    #[must_use]
    pub fn with_stock(mut self, item: Item, count: u32) -> Self {
        self.set_stock(item, count);
        self
    }

    /// Sets the stock level of an item. A count of zero removes the entry.
    pub fn set_stock(&mut self, item: Item, count: u32) {
        if count == 0 {
            self.stock.remove(&item.id);
        } else {
            self.stock
                .insert(item.id.clone(), StockEntry::new(item, count));
        }
    }

    /// Units of an item on hand, zero when not stocked.
    #[must_use]
    pub fn available(&self, item: &ItemId) -> u32 {
        self.stock.get(item).map_or(0, |entry| entry.count)
    }

    /// Stock entries ordered by item id.
    #[must_use]
    pub fn sorted_stock(&self) -> Vec<&StockEntry> {
        let mut entries: Vec<&StockEntry> = self.stock.values().collect();
        entries.sort_by(|a, b| a.item.id.cmp(&b.item.id));
        entries
    }

    /// Total units across every stocked item.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.stock.values().map(|entry| u64::from(entry.count)).sum()
    }

    /// Removes stock entries whose count dropped to zero.
    pub fn prune_empty(&mut self) {
        self.stock.retain(|_, entry| entry.count > 0);
    }

    /// Checks identifiers and coordinates.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id or an invalid location.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::Validation {
                field: "storehouse.id".into(),
                message: "storehouse id cannot be empty".into(),
            });
        }
        self.location.validate()
    }
}

/// Snapshot of every storehouse and its stock.
///
/// # Examples
///
/// ```
/// use depot::{Coordinate, Inventory, Item, Size, Storehouse};
///
/// let bolt = Item::new("bolt", "bolt", Size::new(0.01, 0.01, 0.05), 0.02);
/// let inventory: Inventory = [
///     Storehouse::new("a", "A", Coordinate::new(50.0, 50.0)).with_stock(bolt, 10),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut simulation = inventory.snapshot();
/// simulation.get_mut(&"a".into()).unwrap().stock.clear();
///
/// // The original is untouched.
/// assert_eq!(inventory.available(&"a".into(), &"bolt".into()), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    storehouses: HashMap<StorehouseId, Storehouse>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an independent deep copy for simulation.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Adds or replaces a storehouse.
    pub fn insert(&mut self, storehouse: Storehouse) {
        self.storehouses.insert(storehouse.id.clone(), storehouse);
    }

    /// Looks up a storehouse.
    #[must_use]
    pub fn get(&self, id: &StorehouseId) -> Option<&Storehouse> {
        self.storehouses.get(id)
    }

    /// Looks up a storehouse for mutation.
    pub fn get_mut(&mut self, id: &StorehouseId) -> Option<&mut Storehouse> {
        self.storehouses.get_mut(id)
    }

    /// Returns true if the storehouse exists.
    #[must_use]
    pub fn contains(&self, id: &StorehouseId) -> bool {
        self.storehouses.contains_key(id)
    }

    /// Number of storehouses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storehouses.len()
    }

    /// Returns true if there are no storehouses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storehouses.is_empty()
    }

    /// Iterates over storehouses in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Storehouse> {
        self.storehouses.values()
    }

    /// Units of `item` held by `storehouse`, zero when either is unknown.
    #[must_use]
    pub fn available(&self, storehouse: &StorehouseId, item: &ItemId) -> u32 {
        self.get(storehouse).map_or(0, |s| s.available(item))
    }

    /// Units of `item` across every storehouse.
    #[must_use]
    pub fn total_available(&self, item: &ItemId) -> u64 {
        self.iter().map(|s| u64::from(s.available(item))).sum()
    }

    /// Takes up to `count` units of `item` from `storehouse` and returns how
    /// many were taken. Unknown storehouses and items yield zero.
    ///
    /// The stock entry is left in place even when it reaches zero; call
    /// [`Inventory::prune_empty`] once the simulation is done.
    pub fn take(&mut self, storehouse: &StorehouseId, item: &ItemId, count: u32) -> u32 {
        let Some(stock) = self
            .storehouses
            .get_mut(storehouse)
            .and_then(|s| s.stock.get_mut(item))
        else {
            return 0;
        };
        let taken = count.min(stock.count);
        stock.count -= taken;
        taken
    }

    /// Storehouses ordered by great-circle distance to `destination`,
    /// nearest first. Equal distances fall back to ascending id.
    #[must_use]
    pub fn ranked_by_distance(&self, destination: Coordinate) -> Vec<&Storehouse> {
        let mut ranked: Vec<(f64, &Storehouse)> = self
            .iter()
            .map(|s| (s.location.distance_to(destination), s))
            .collect();
        ranked.sort_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));
        ranked.into_iter().map(|(_, s)| s).collect()
    }

    /// Removes every zero-count stock entry.
    pub fn prune_empty(&mut self) {
        for storehouse in self.storehouses.values_mut() {
            storehouse.prune_empty();
        }
    }

    /// Returns true if no storehouse holds a zero-count stock entry.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.iter()
            .all(|s| s.stock.values().all(|entry| entry.count > 0))
    }

    /// Storehouses whose stock differs from the same storehouse in `before`,
    /// ordered by id. Storehouses missing from `before` count as changed.
    #[must_use]
    pub fn changed_since<'a>(&'a self, before: &Self) -> Vec<&'a Storehouse> {
        let mut changed: Vec<&Storehouse> = self
            .iter()
            .filter(|s| before.get(&s.id).map_or(true, |old| old.stock != s.stock))
            .collect();
        changed.sort_by(|a, b| a.id.cmp(&b.id));
        changed
    }
}

impl FromIterator<Storehouse> for Inventory {
    fn from_iter<T: IntoIterator<Item = Storehouse>>(iter: T) -> Self {
        let mut inventory = Self::new();
        for storehouse in iter {
            inventory.insert(storehouse);
        }
        inventory
    }
}
