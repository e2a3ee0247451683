//! Error types for the depot library.
//!
//! Two layers live here. [`Error`] is the crate-wide error returned by
//! storage, configuration and service operations. [`Violation`] is a domain
//! rule broken by a reservation request or a reservation lifecycle step;
//! allocation and costing accumulate violations into [`Violations`] instead
//! of stopping at the first one.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::inventory::StorehouseId;
use crate::item::ItemId;

/// Result type alias for operations that may fail with a depot error.
///
/// # Examples
///
/// ```
/// use depot::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(5)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the depot library.
#[derive(Debug, Error)]
pub enum Error {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// An allocation was rejected because it broke one or more rules.
    #[error("allocation rejected:\n{0}")]
    Allocation(Violations),

    /// A reservation could not be applied to or removed from inventory.
    #[error("inventory update rejected: {0}")]
    Inventory(#[from] Violation),

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl Error {
    /// Returns true if this error reports broken reservation rules.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Allocation(_) | Self::Inventory(_))
    }

    /// Returns true if this error indicates a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this error is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if this error came from the configuration layer.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns the violations carried by this error, if any.
    #[must_use]
    pub fn violations(&self) -> Vec<&Violation> {
        match self {
            Self::Allocation(violations) => violations.iter().collect(),
            Self::Inventory(violation) => vec![violation],
            _ => Vec::new(),
        }
    }
}

/// A reservation rule that a request or lifecycle step broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A storehouse id does not resolve to a known storehouse.
    #[error("unknown storehouse: {storehouse}")]
    UnknownStorehouse {
        /// The unresolved storehouse id.
        storehouse: StorehouseId,
    },

    /// An item id does not resolve to a catalog item or stock entry.
    #[error("unknown item: {item}")]
    UnknownItem {
        /// The unresolved item id.
        item: ItemId,
    },

    /// A storehouse does not hold enough of an item.
    #[error(
        "not enough items in storehouse: storehouse id: {storehouse}, item id: {item} \
         (requested {requested}, available {available})"
    )]
    NotEnoughItemsInStorehouse {
        /// The storehouse that was asked.
        storehouse: StorehouseId,
        /// The item that was asked for.
        item: ItemId,
        /// Units requested.
        requested: u32,
        /// Units on hand.
        available: u32,
    },

    /// Every storehouse together could not cover an unsourced entry.
    #[error("not enough items in all storehouses, item: {item} (short by {shortfall})")]
    NotEnoughItemsInAllStorehouses {
        /// The item that ran out.
        item: ItemId,
        /// Units that could not be allocated.
        shortfall: u32,
    },

    /// A release asked for more units than a reservation entry holds.
    #[error(
        "not enough items in reservation: storehouse id: {storehouse}, item id: {item} \
         (reserved {reserved}, requested {requested})"
    )]
    NotEnoughItemsInReservation {
        /// The entry's source storehouse.
        storehouse: StorehouseId,
        /// The entry's item.
        item: ItemId,
        /// Units held by the entry.
        reserved: u32,
        /// Units the release asked for.
        requested: u32,
    },

    /// Returning units would push a stock count past `u32::MAX`.
    #[error(
        "stock overflow: storehouse id: {storehouse}, item id: {item} \
         (on hand {available}, returning {returned})"
    )]
    StockOverflow {
        /// The storehouse receiving the units.
        storehouse: StorehouseId,
        /// The item being returned.
        item: ItemId,
        /// Units on hand before the return.
        available: u32,
        /// Units being returned.
        returned: u32,
    },

    /// A release named (item, storehouse) pairs the reservation does not hold.
    #[error("invalid release items: {}", format_pairs(.pairs))]
    InvalidReleaseItems {
        /// The unmatched (item, storehouse) pairs, in request order.
        pairs: Vec<(ItemId, StorehouseId)>,
    },
}

fn format_pairs(pairs: &[(ItemId, StorehouseId)]) -> String {
    pairs
        .iter()
        .map(|(item, storehouse)| format!("{item}@{storehouse}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fieldless mirror of [`Violation`] for matching and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// See [`Violation::UnknownStorehouse`].
    UnknownStorehouse,
    /// See [`Violation::UnknownItem`].
    UnknownItem,
    /// See [`Violation::NotEnoughItemsInStorehouse`].
    NotEnoughItemsInStorehouse,
    /// See [`Violation::NotEnoughItemsInAllStorehouses`].
    NotEnoughItemsInAllStorehouses,
    /// See [`Violation::NotEnoughItemsInReservation`].
    NotEnoughItemsInReservation,
    /// See [`Violation::StockOverflow`].
    StockOverflow,
    /// See [`Violation::InvalidReleaseItems`].
    InvalidReleaseItems,
}

impl Violation {
    /// Returns the kind of this violation.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        match self {
            Self::UnknownStorehouse { .. } => ViolationKind::UnknownStorehouse,
            Self::UnknownItem { .. } => ViolationKind::UnknownItem,
            Self::NotEnoughItemsInStorehouse { .. } => ViolationKind::NotEnoughItemsInStorehouse,
            Self::NotEnoughItemsInAllStorehouses { .. } => {
                ViolationKind::NotEnoughItemsInAllStorehouses
            }
            Self::NotEnoughItemsInReservation { .. } => ViolationKind::NotEnoughItemsInReservation,
            Self::StockOverflow { .. } => ViolationKind::StockOverflow,
            Self::InvalidReleaseItems { .. } => ViolationKind::InvalidReleaseItems,
        }
    }
}

/// An ordered list of violations collected by one operation.
///
/// Allocation and costing never stop at the first broken rule; they push
/// every violation here and still return their best-effort result.
///
/// # Examples
///
/// ```
/// use depot::error::{Violation, ViolationKind, Violations};
/// use depot::ItemId;
///
/// let mut violations = Violations::new();
/// assert!(violations.is_empty());
///
/// violations.push(Violation::UnknownItem { item: ItemId::from("10") });
/// assert!(violations.contains(ViolationKind::UnknownItem));
/// assert_eq!(violations.to_string(), "unknown item: 10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a violation.
    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Appends every violation from another list, keeping order.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns true if no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the violations in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Returns true if any recorded violation has the given kind.
    #[must_use]
    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.kind() == kind)
    }

    /// Returns the violations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Converts the list into `Ok(value)` when empty, or an allocation error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] when at least one violation was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(Error::Allocation(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
