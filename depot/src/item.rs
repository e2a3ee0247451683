//! Catalog items.
//!
//! An [`Item`] is immutable once loaded. The [`Catalog`] maps item ids to
//! items and is the lookup the cost calculator and release path consult.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque catalog item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an item id.
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

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Physical dimensions of an item, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Length in meters.
    pub length_meters: f64,
    /// Width in meters.
    pub width_meters: f64,
    /// Height in meters.
    pub height_meters: f64,
}

impl Size {
    /// Creates a size from its three dimensions.
    #[must_use]
    pub const fn new(length_meters: f64, width_meters: f64, height_meters: f64) -> Self {
        Self {
            length_meters,
            width_meters,
            height_meters,
        }
    }

    /// Volume in cubic meters.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.length_meters * self.width_meters * self.height_meters
    }
}

/// A catalog record.
///
/// # Examples
///
/// ```
/// use depot::{Item, ItemId, Size};
///
/// let item = Item::new("1", "crate", Size::new(2.0, 3.0, 4.0), 5.0);
/// assert_eq!(item.id, ItemId::from("1"));
/// assert_eq!(item.volume(), 24.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Physical dimensions.
    pub size: Size,
    /// Weight in kilograms.
    pub weight_kilograms: f64,
}

impl Item {
    /// Creates an item.
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        size: Size,
        weight_kilograms: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            weight_kilograms,
        }
    }

    /// Volume in cubic meters.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.size.volume()
    }

    /// Per-unit transport metric: `ln(max(weight, volume))`.
    ///
    /// When neither weight nor volume is positive the logarithm is taken of
    /// `floor` instead, so the metric stays finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use depot::{Item, Size};
    ///
    /// let heavy = Item::new("1", "anvil", Size::new(0.1, 0.1, 0.1), 50.0);
    /// assert_eq!(heavy.cost_metric(1.0), 50.0_f64.ln());
    ///
    /// let weightless = Item::new("2", "voucher", Size::default(), 0.0);
    /// assert_eq!(weightless.cost_metric(1.0), 0.0);
    /// ```
    #[must_use]
    pub fn cost_metric(&self, floor: f64) -> f64 {
        let magnitude = self.weight_kilograms.max(self.volume());
        if magnitude > 0.0 {
            magnitude.ln()
        } else {
            floor.ln()
        }
    }

    /// Checks that the item is usable by the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or for a negative or
    /// non-finite dimension or weight.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::Validation {
                field: "item.id".into(),
                message: "item id cannot be empty".into(),
            });
        }
        let fields = [
            ("length_meters", self.size.length_meters),
            ("width_meters", self.size.width_meters),
            ("height_meters", self.size.height_meters),
            ("weight_kilograms", self.weight_kilograms),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Validation {
                    field: format!("item.{field}"),
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Catalog lookup from item id to item.
pub type Catalog = HashMap<ItemId, Item>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume() {
        let item = Item::new("1", "box", Size::new(1.0, 2.0, 3.0), 1.0);
        assert_eq!(item.volume(), 6.0);
    }

    #[test]
    fn test_cost_metric_uses_larger_of_weight_and_volume() {
        let bulky = Item::new("1", "sofa", Size::new(3.0, 4.0, 5.0), 10.0);
        assert_eq!(bulky.cost_metric(1.0), 60.0_f64.ln());

        let dense = Item::new("2", "ingot", Size::new(0.1, 0.1, 0.1), 12.0);
        assert_eq!(dense.cost_metric(1.0), 12.0_f64.ln());
    }

    #[test]
    fn test_cost_metric_floor_applies_only_to_non_positive() {
        let empty = Item::new("1", "ghost", Size::default(), 0.0);
        assert_eq!(empty.cost_metric(1.0), 0.0);
        assert_eq!(empty.cost_metric(std::f64::consts::E), 1.0);

        // Small but positive items keep their (negative) logarithm.
        let feather = Item::new("2", "feather", Size::new(0.1, 0.1, 0.1), 0.5);
        assert_eq!(feather.cost_metric(1.0), 0.5_f64.ln());
    }

    #[test]
    fn test_validate() {
        assert!(Item::new("1", "ok", Size::new(1.0, 1.0, 1.0), 1.0)
            .validate()
            .is_ok());
        assert!(Item::new("", "no id", Size::default(), 1.0)
            .validate()
            .is_err());

        let err = Item::new("1", "neg", Size::new(-1.0, 1.0, 1.0), 1.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("length_meters"));
    }

    #[test]
    fn test_item_id_conversions() {
        let id = ItemId::from("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(ItemId::from(String::from("abc")), id);
        assert!(ItemId::new("").is_empty());
    }
}
