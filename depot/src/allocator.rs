//! Greedy nearest-first allocation.
//!
//! The allocator turns a [`ReserveRequest`] into a [`Reservation`] in two
//! phases. Pinned entries are checked against their storehouse first. Then
//! every unsourced entry is filled from storehouses in ranked order, taking
//! as much as each one holds until the entry is covered.
//!
//! Violations never stop the walk. The returned [`Allocation`] carries the
//! most complete reservation achievable together with every violation found;
//! the caller decides whether a partial result is acceptable.
//!
//! The greedy policy minimizes distance per step, not total transport cost.

use crate::error::{Violation, Violations};
use crate::geo::Coordinate;
use crate::inventory::{Inventory, StorehouseId};
use crate::reservation::{Reservation, ReservationEntry, ReserveRequest};
use crate::Result;

/// Orders storehouses for unsourced allocation.
#[cfg_attr(test, mockall::automock)]
pub trait StorehouseRanking {
    /// Returns storehouse ids in the order they should be drained.
    fn rank(&self, inventory: &Inventory, destination: Coordinate) -> Vec<StorehouseId>;
}

/// Ranks storehouses by great-circle distance to the destination.
///
/// Equal distances fall back to ascending storehouse id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestFirst;

impl StorehouseRanking for NearestFirst {
    fn rank(&self, inventory: &Inventory, destination: Coordinate) -> Vec<StorehouseId> {
        inventory
            .ranked_by_distance(destination)
            .into_iter()
            .map(|s| s.id.clone())
            .collect()
    }
}

/// Outcome of allocating a request.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// The reservation built from every entry that could be satisfied.
    pub reservation: Reservation,
    /// Simulated inventory after taking the reserved units, pruned.
    pub inventory: Inventory,
    /// Every violation found, in discovery order.
    pub violations: Violations,
}

impl Allocation {
    /// Returns true if every requested unit was allocated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.violations.is_empty()
    }

    /// Rejects the allocation if any violation was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Allocation`] carrying every violation.
    pub fn into_result(self) -> Result<(Reservation, Inventory)> {
        self.violations
            .into_result((self.reservation, self.inventory))
    }
}

/// Builds reservations from requests.
///
/// # Examples
///
/// ```
/// use depot::{Allocator, Coordinate, Inventory, Item, ReserveEntry, ReserveRequest, Size, Storehouse};
///
/// let item = Item::new("3", "three", Size::new(3.0, 4.0, 5.0), 3.0);
/// let inventory: Inventory = [
///     Storehouse::new("a", "A", Coordinate::new(50.0, 50.0)).with_stock(item, 7),
/// ]
/// .into_iter()
/// .collect();
///
/// let request = ReserveRequest::new(
///     Coordinate::new(40.0, 40.0),
///     vec![ReserveEntry::unsourced("3", 5)],
/// );
///
/// let allocation = Allocator::default().build_reservation(&request, &inventory);
/// assert!(allocation.is_complete());
/// assert_eq!(allocation.reservation.entries()[0].count, 5);
/// assert_eq!(allocation.inventory.available(&"a".into(), &"3".into()), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Allocator<R: StorehouseRanking = NearestFirst> {
    ranking: R,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::with_ranking(NearestFirst)
    }
}

impl<R: StorehouseRanking> Allocator<R> {
    /// Creates an allocator with a custom storehouse ranking.
    pub const fn with_ranking(ranking: R) -> Self {
        Self { ranking }
    }

    /// Allocates `request` against `inventory` without modifying it.
    ///
    /// Entries with a zero count are ignored. The reservation lists pinned
    /// entries first, then distributed entries in request order.
    #[must_use]
    pub fn build_reservation(&self, request: &ReserveRequest, inventory: &Inventory) -> Allocation {
        let mut simulated = inventory.snapshot();
        let mut violations = Violations::new();

        let known = Self::take_pinned(request, &mut simulated, &mut violations);
        let distributed = self.distribute(request, &mut simulated, &mut violations);

        simulated.prune_empty();

        let reservation = Reservation::from_parts(
            request.destination,
            known.into_iter().chain(distributed).collect(),
        );

        log::debug!(
            "allocated reservation {} with {} entries and {} violations",
            reservation.id(),
            reservation.entries().len(),
            violations.len()
        );

        Allocation {
            reservation,
            inventory: simulated,
            violations,
        }
    }

    fn take_pinned(
        request: &ReserveRequest,
        simulated: &mut Inventory,
        violations: &mut Violations,
    ) -> Vec<ReservationEntry> {
        let mut known = Vec::new();

        for entry in request.entries.iter().filter(|e| e.count > 0) {
            let Some(source) = entry.source() else {
                continue;
            };
            let Some(storehouse) = simulated.get_mut(source) else {
                violations.push(Violation::UnknownStorehouse {
                    storehouse: source.clone(),
                });
                continue;
            };

            match storehouse.stock.get_mut(&entry.item) {
                Some(stock) if stock.count >= entry.count => {
                    stock.count -= entry.count;
                    known.push(ReservationEntry::new(
                        entry.item.clone(),
                        entry.count,
                        source.clone(),
                    ));
                }
                stock => violations.push(Violation::NotEnoughItemsInStorehouse {
                    storehouse: source.clone(),
                    item: entry.item.clone(),
                    requested: entry.count,
                    available: stock.map_or(0, |s| s.count),
                }),
            }
        }

        known
    }

    fn distribute(
        &self,
        request: &ReserveRequest,
        simulated: &mut Inventory,
        violations: &mut Violations,
    ) -> Vec<ReservationEntry> {
        let ranked = self.ranking.rank(simulated, request.destination);
        let mut distributed = Vec::new();

        for entry in request.entries.iter().filter(|e| e.source().is_none()) {
            let mut remaining = entry.count;

            for id in &ranked {
                if remaining == 0 {
                    break;
                }
                let taken = simulated.take(id, &entry.item, remaining);
                if taken == 0 {
                    continue;
                }
                remaining -= taken;
                log::debug!("taking {taken} x {} from storehouse {id}", entry.item);
                distributed.push(ReservationEntry::new(entry.item.clone(), taken, id.clone()));
            }

            if remaining > 0 {
                violations.push(Violation::NotEnoughItemsInAllStorehouses {
                    item: entry.item.clone(),
                    shortfall: remaining,
                });
            }
        }

        distributed
    }
}

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use crate::fixtures;
    use crate::inventory::Storehouse;
    use crate::item::ItemId;
    use crate::reservation::ReserveEntry;

    fn allocate(request: &ReserveRequest, inventory: &Inventory) -> Allocation {
        Allocator::default().build_reservation(request, inventory)
    }

    #[test]
    fn test_mixed_request_entries_and_violations() {
        let inventory = fixtures::inventory();
        let allocation = allocate(&fixtures::mixed_request(), &inventory);

        assert_eq!(
            allocation.reservation.entries(),
            fixtures::mixed_request_entries().as_slice()
        );

        let expected = Violations::from(vec![
            Violation::NotEnoughItemsInStorehouse {
                storehouse: "a".into(),
                item: "1".into(),
                requested: 5,
                available: 2,
            },
            Violation::NotEnoughItemsInStorehouse {
                storehouse: "a".into(),
                item: "2".into(),
                requested: 5,
                available: 0,
            },
            Violation::UnknownStorehouse {
                storehouse: "A".into(),
            },
            Violation::NotEnoughItemsInAllStorehouses {
                item: "4".into(),
                shortfall: 5,
            },
            Violation::NotEnoughItemsInAllStorehouses {
                item: "5".into(),
                shortfall: 3,
            },
        ]);
        assert_eq!(allocation.violations, expected);
        assert!(!allocation.is_complete());
    }

    #[test]
    fn test_mixed_request_leaves_input_untouched() {
        let inventory = fixtures::inventory();
        let _ = allocate(&fixtures::mixed_request(), &inventory);
        assert_eq!(inventory, fixtures::inventory());
    }

    #[test]
    fn test_mixed_request_simulated_inventory() {
        let allocation = allocate(&fixtures::mixed_request(), &fixtures::inventory());
        let inv = &allocation.inventory;

        assert_eq!(inv.available(&"a".into(), &"1".into()), 2);
        assert_eq!(inv.available(&"a".into(), &"3".into()), 2);
        assert_eq!(inv.available(&"a".into(), &"6".into()), 1);
        assert_eq!(inv.available(&"b".into(), &"7".into()), 1);
        assert_eq!(inv.available(&"b".into(), &"8".into()), 1);
        // Drained entries are pruned, not left at zero.
        assert!(inv.get(&"a".into()).unwrap().stock.get(&"5".into()).is_none());
        assert!(inv.get(&"a".into()).unwrap().stock.get(&"8".into()).is_none());
        assert!(inv.is_settled());
    }

    #[test]
    fn test_single_storehouse_scenario() {
        let inventory: Inventory = [Storehouse::new("a", "a", Coordinate::new(50.0, 50.0))
            .with_stock(fixtures::item(3), 7)]
        .into_iter()
        .collect();
        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![ReserveEntry::unsourced("3", 5)],
        );

        let allocation = allocate(&request, &inventory);

        assert!(allocation.is_complete());
        assert_eq!(
            allocation.reservation.entries(),
            &[ReservationEntry::new("3", 5, "a")]
        );
        assert_eq!(allocation.inventory.available(&"a".into(), &"3".into()), 2);
    }

    #[test]
    fn test_split_across_two_storehouses() {
        let inventory: Inventory = [
            Storehouse::new("a", "a", Coordinate::new(50.0, 50.0)).with_stock(fixtures::item(5), 1),
            Storehouse::new("b", "b", Coordinate::new(60.0, 60.0)).with_stock(fixtures::item(5), 1),
        ]
        .into_iter()
        .collect();
        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![ReserveEntry::unsourced("5", 2)],
        );

        let allocation = allocate(&request, &inventory);

        assert!(allocation.is_complete());
        let entries = allocation.reservation.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.count == 1));
        let mut sources: Vec<&str> = entries.iter().map(|e| e.storehouse.as_str()).collect();
        sources.sort_unstable();
        assert_eq!(sources, vec!["a", "b"]);
    }

    #[test]
    fn test_item_stocked_nowhere() {
        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![ReserveEntry::unsourced("4", 5)],
        );
        let allocation = allocate(&request, &fixtures::inventory());

        assert!(allocation.reservation.entries().is_empty());
        assert_eq!(
            allocation.violations.as_slice(),
            &[Violation::NotEnoughItemsInAllStorehouses {
                item: ItemId::from("4"),
                shortfall: 5,
            }]
        );
    }

    #[test]
    fn test_pinned_entries_share_simulated_stock() {
        // Two pinned entries for the same pair cannot jointly oversell.
        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![
                ReserveEntry::sourced("3", 4, "a"),
                ReserveEntry::sourced("3", 4, "a"),
            ],
        );
        let allocation = allocate(&request, &fixtures::inventory());

        assert_eq!(
            allocation.reservation.entries(),
            &[ReservationEntry::new("3", 4, "a")]
        );
        assert_eq!(allocation.violations.len(), 1);
        assert!(allocation
            .violations
            .contains(ViolationKind::NotEnoughItemsInStorehouse));
    }

    #[test]
    fn test_pinned_entries_reduce_stock_for_unsourced() {
        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![
                ReserveEntry::unsourced("8", 4),
                ReserveEntry::sourced("8", 3, "a"),
            ],
        );
        let allocation = allocate(&request, &fixtures::inventory());

        // The pinned entry wins storehouse a; the unsourced one falls back to b.
        assert_eq!(
            allocation.reservation.entries(),
            &[
                ReservationEntry::new("8", 3, "a"),
                ReservationEntry::new("8", 3, "b"),
            ]
        );
        assert_eq!(
            allocation.violations.as_slice(),
            &[Violation::NotEnoughItemsInAllStorehouses {
                item: ItemId::from("8"),
                shortfall: 1,
            }]
        );
    }

    #[test]
    fn test_zero_count_entries_are_ignored() {
        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![
                ReserveEntry::unsourced("3", 0),
                ReserveEntry::sourced("2", 0, "AAA"),
            ],
        );
        let allocation = allocate(&request, &fixtures::inventory());
        assert!(allocation.reservation.entries().is_empty());
        assert!(allocation.is_complete());
    }

    #[test]
    fn test_into_result() {
        let ok = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![ReserveEntry::unsourced("6", 2)],
        );
        let (reservation, _) = allocate(&ok, &fixtures::inventory())
            .into_result()
            .unwrap();
        assert_eq!(reservation.entries().len(), 1);

        let err = allocate(&fixtures::mixed_request(), &fixtures::inventory())
            .into_result()
            .unwrap_err();
        assert_eq!(err.violations().len(), 5);
    }

    #[test]
    fn test_nearest_first_ranking() {
        let ranked = NearestFirst.rank(&fixtures::inventory(), Coordinate::new(70.0, 70.0));
        assert_eq!(ranked, vec![StorehouseId::from("b"), StorehouseId::from("a")]);

        let ranked = NearestFirst.rank(&fixtures::inventory(), Coordinate::new(40.0, 40.0));
        assert_eq!(ranked, vec![StorehouseId::from("a"), StorehouseId::from("b")]);
    }

    #[test]
    fn test_nearest_first_ties_break_by_id() {
        let inventory: Inventory = ["c", "a", "b"]
            .into_iter()
            .map(|id| Storehouse::new(id, id, Coordinate::new(10.0, 10.0)))
            .collect();
        let ranked = NearestFirst.rank(&inventory, Coordinate::new(0.0, 0.0));
        assert_eq!(
            ranked,
            vec![
                StorehouseId::from("a"),
                StorehouseId::from("b"),
                StorehouseId::from("c")
            ]
        );
    }

    #[test]
    fn test_custom_ranking_controls_order() {
        let mut ranking = MockStorehouseRanking::new();
        ranking
            .expect_rank()
            .times(1)
            .returning(|_, _| vec![StorehouseId::from("b"), StorehouseId::from("a")]);

        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![ReserveEntry::unsourced("8", 4)],
        );
        let allocation =
            Allocator::with_ranking(ranking).build_reservation(&request, &fixtures::inventory());

        assert_eq!(
            allocation.reservation.entries(),
            &[
                ReservationEntry::new("8", 3, "b"),
                ReservationEntry::new("8", 1, "a"),
            ]
        );
    }

    #[test]
    fn test_ranking_may_omit_storehouses() {
        let mut ranking = MockStorehouseRanking::new();
        ranking
            .expect_rank()
            .returning(|_, _| vec![StorehouseId::from("ghost"), StorehouseId::from("b")]);

        let request = ReserveRequest::new(
            Coordinate::new(40.0, 40.0),
            vec![ReserveEntry::unsourced("6", 1)],
        );
        let allocation =
            Allocator::with_ranking(ranking).build_reservation(&request, &fixtures::inventory());

        assert!(allocation.reservation.entries().is_empty());
        assert!(allocation
            .violations
            .contains(ViolationKind::NotEnoughItemsInAllStorehouses));
    }
}
