//! Property-based tests for nearest-first allocation.

use std::collections::HashMap;

use super::Allocator;
use crate::error::Violation;
use crate::fixtures;
use crate::geo::Coordinate;
use crate::inventory::{Inventory, Storehouse, StorehouseId};
use crate::item::ItemId;
use crate::reservation::{Effect, ReservationEntry, ReserveEntry, ReserveRequest};
use proptest::prelude::*;

const STOREHOUSES: usize = 4;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-80.0f64..=80.0, -170.0f64..=170.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
}

/// Storehouses `s0`..`s3` at random places, stocking items 1..=5 with
/// 0..10 units each. Zero counts are never stored.
fn inventory_strategy() -> impl Strategy<Value = Inventory> {
    prop::collection::vec(
        (coordinate(), prop::collection::vec(0u32..10, 5)),
        STOREHOUSES,
    )
    .prop_map(|storehouses| {
        storehouses
            .into_iter()
            .enumerate()
            .map(|(i, (location, counts))| {
                let mut storehouse = Storehouse::new(format!("s{i}"), format!("s{i}"), location);
                for (n, count) in (1..=5).zip(counts) {
                    storehouse.set_stock(fixtures::item(n), count);
                }
                storehouse
            })
            .collect()
    })
}

/// Entries for items 1..=6 (item 6 is never stocked), unsourced or pinned
/// to a known storehouse.
fn request_strategy() -> impl Strategy<Value = ReserveRequest> {
    (
        coordinate(),
        prop::collection::vec(
            (1u32..=6, 1u32..15, prop::option::of(0..STOREHOUSES)),
            1..8,
        ),
    )
        .prop_map(|(destination, entries)| {
            let entries = entries
                .into_iter()
                .map(|(item, count, source)| match source {
                    Some(s) => ReserveEntry::sourced(item.to_string(), count, format!("s{s}")),
                    None => ReserveEntry::unsourced(item.to_string(), count),
                })
                .collect();
            ReserveRequest::new(destination, entries)
        })
}

fn reserved_by_pair(entries: &[ReservationEntry]) -> HashMap<(StorehouseId, ItemId), u32> {
    let mut totals = HashMap::new();
    for entry in entries {
        *totals
            .entry((entry.storehouse.clone(), entry.item.clone()))
            .or_insert(0) += entry.count;
    }
    totals
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    #[test]
    fn allocation_never_oversells(inventory in inventory_strategy(), request in request_strategy()) {
        let allocation = Allocator::default().build_reservation(&request, &inventory);

        for ((storehouse, item), reserved) in reserved_by_pair(allocation.reservation.entries()) {
            let before = inventory.available(&storehouse, &item);
            prop_assert!(reserved <= before);
            prop_assert_eq!(allocation.inventory.available(&storehouse, &item), before - reserved);
        }
        prop_assert!(allocation.inventory.is_settled());
        prop_assert!(allocation.reservation.entries().iter().all(|e| e.count > 0));
    }

    #[test]
    fn reserved_units_account_for_every_violation(
        inventory in inventory_strategy(),
        request in request_strategy(),
    ) {
        let allocation = Allocator::default().build_reservation(&request, &inventory);

        let requested: u64 = request.entries.iter().map(|e| u64::from(e.count)).sum();
        let missing: u64 = allocation
            .violations
            .iter()
            .map(|v| match v {
                Violation::NotEnoughItemsInAllStorehouses { shortfall, .. } => u64::from(*shortfall),
                Violation::NotEnoughItemsInStorehouse { requested, .. } => u64::from(*requested),
                _ => 0,
            })
            .sum();

        prop_assert_eq!(allocation.reservation.total_units(), requested - missing);
    }

    #[test]
    fn allocation_leaves_input_untouched(inventory in inventory_strategy(), request in request_strategy()) {
        let before = inventory.clone();
        let _ = Allocator::default().build_reservation(&request, &inventory);
        prop_assert_eq!(inventory, before);
    }

    #[test]
    fn applying_the_reservation_matches_the_simulation(
        inventory in inventory_strategy(),
        request in request_strategy(),
    ) {
        let allocation = Allocator::default().build_reservation(&request, &inventory);
        let catalog = fixtures::catalog();

        let applied = allocation
            .reservation
            .apply_effect(&inventory, Effect::Reserve, &catalog)
            .unwrap();
        prop_assert_eq!(&applied, &allocation.inventory);

        let restored = allocation
            .reservation
            .apply_effect(&applied, Effect::Release, &catalog)
            .unwrap();
        prop_assert_eq!(restored, inventory);
    }
}
