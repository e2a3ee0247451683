//! Transport cost of a reservation.
//!
//! Entries are grouped by source storehouse. Each group costs
//! `distance_factor * distance * metric + handling_surcharge`, where the
//! metric sums `ln(max(weight, volume)) * count` over the group's entries.
//! Lookup failures are collected, and the total keeps every group that
//! could be priced.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Violation, Violations};
use crate::inventory::{Inventory, StorehouseId};
use crate::item::Catalog;
use crate::reservation::{Reservation, ReservationEntry};

/// Default cost per kilometer per metric unit.
pub const DEFAULT_DISTANCE_FACTOR: f64 = 1.0;

/// Default flat charge per storehouse touched.
pub const DEFAULT_HANDLING_SURCHARGE: f64 = 1000.0;

/// Default substitute magnitude for items with no weight and no volume.
pub const DEFAULT_METRIC_FLOOR: f64 = 1.0;

/// Cost coefficients.
///
/// # Examples
///
/// ```
/// use depot::CostModel;
///
/// let model = CostModel::default();
/// assert_eq!(model.distance_factor, 1.0);
/// assert_eq!(model.handling_surcharge, 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostModel {
    /// Multiplier on distance times metric.
    pub distance_factor: f64,
    /// Added once per storehouse group.
    pub handling_surcharge: f64,
    /// Used in place of `max(weight, volume)` when that is not positive.
    pub metric_floor: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            distance_factor: DEFAULT_DISTANCE_FACTOR,
            handling_surcharge: DEFAULT_HANDLING_SURCHARGE,
            metric_floor: DEFAULT_METRIC_FLOOR,
        }
    }
}

/// Result of pricing a reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    /// Sum over every priced storehouse group.
    pub total: f64,
    /// Lookup failures, ordered by storehouse id then entry order.
    pub violations: Violations,
}

impl CostModel {
    /// Prices a reservation against the given storehouses and catalog.
    ///
    /// An entry whose item is missing from `catalog` is skipped with
    /// [`Violation::UnknownItem`]. A group whose storehouse is missing from
    /// `inventory` is skipped entirely with [`Violation::UnknownStorehouse`].
    #[must_use]
    pub fn total_cost(
        &self,
        reservation: &Reservation,
        inventory: &Inventory,
        catalog: &Catalog,
    ) -> CostReport {
        let mut groups: BTreeMap<&StorehouseId, Vec<&ReservationEntry>> = BTreeMap::new();
        for entry in reservation.entries() {
            groups.entry(&entry.storehouse).or_default().push(entry);
        }

        let mut total = 0.0;
        let mut violations = Violations::new();

        for (storehouse_id, entries) in groups {
            let Some(storehouse) = inventory.get(storehouse_id) else {
                violations.push(Violation::UnknownStorehouse {
                    storehouse: storehouse_id.clone(),
                });
                continue;
            };

            let distance = storehouse.location.distance_to(reservation.destination());
            let mut metric = 0.0;
            for entry in entries {
                match catalog.get(&entry.item) {
                    Some(item) => {
                        metric += item.cost_metric(self.metric_floor) * f64::from(entry.count);
                    }
                    None => violations.push(Violation::UnknownItem {
                        item: entry.item.clone(),
                    }),
                }
            }

            total += self.distance_factor * distance * metric + self.handling_surcharge;
        }

        CostReport { total, violations }
    }
}
