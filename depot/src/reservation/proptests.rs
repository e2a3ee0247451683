//! Property-based tests for the reservation lifecycle.

use std::collections::HashSet;

use super::{Effect, Reservation, ReservationEntry, ReservationState};
use crate::fixtures;
use crate::geo::Coordinate;
use crate::inventory::{Inventory, Storehouse};
use proptest::prelude::*;

/// A reservation with unique (item, storehouse) pairs drawn from items
/// 1..=8 and storehouses `a`, `b`, `c`.
fn reservation_strategy() -> impl Strategy<Value = Reservation> {
    prop::collection::vec((1u32..=8, 0usize..3, 1u32..20), 0..10).prop_map(|raw| {
        let mut seen = HashSet::new();
        let entries: Vec<ReservationEntry> = raw
            .into_iter()
            .filter(|(item, storehouse, _)| seen.insert((*item, *storehouse)))
            .map(|(item, storehouse, count)| {
                ReservationEntry::new(item.to_string(), count, ["a", "b", "c"][storehouse])
            })
            .collect();
        Reservation::builder(Coordinate::new(40.0, 40.0))
            .entries(entries)
            .build()
            .unwrap()
    })
}

/// Stock large enough that any generated reservation can be taken, plus
/// some leftover so pruning has something to keep.
fn covering_inventory(reservation: &Reservation, extra: u32) -> Inventory {
    let mut inventory: Inventory = ["a", "b", "c"]
        .into_iter()
        .map(|id| Storehouse::new(id, id, Coordinate::new(50.0, 50.0)))
        .collect();
    for entry in reservation.entries() {
        let n: u32 = entry.item.as_str().parse().unwrap();
        let storehouse = inventory.get_mut(&entry.storehouse).unwrap();
        storehouse.set_stock(fixtures::item(n), entry.count + extra);
    }
    inventory
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn reserve_then_release_restores_inventory(
        reservation in reservation_strategy(),
        extra in 0u32..3,
    ) {
        let inventory = covering_inventory(&reservation, extra);
        let catalog = fixtures::catalog();

        let reserved = reservation.apply_effect(&inventory, Effect::Reserve, &catalog).unwrap();
        prop_assert!(reserved.is_settled());
        let restored = reservation.apply_effect(&reserved, Effect::Release, &catalog).unwrap();
        prop_assert_eq!(restored, inventory);
    }

    #[test]
    fn release_shrinks_by_exactly_the_released_units(
        reservation in reservation_strategy(),
        fractions in prop::collection::vec(0u32..=100, 10),
    ) {
        let releases: Vec<ReservationEntry> = reservation
            .entries()
            .iter()
            .zip(&fractions)
            .map(|(e, pct)| ReservationEntry::new(e.item.clone(), e.count * pct / 100, e.storehouse.clone()))
            .collect();
        let released: u64 = releases.iter().map(|e| u64::from(e.count)).sum();

        let mut residual = reservation.clone();
        residual.release(&releases).unwrap();

        prop_assert_eq!(residual.total_units(), reservation.total_units() - released);
        prop_assert_eq!(residual.released_units(), released);
        prop_assert!(residual.entries().iter().all(|e| e.count > 0));
        if residual.entries().is_empty() {
            prop_assert_eq!(residual.state(), ReservationState::Empty);
        }
    }

    #[test]
    fn rejected_release_leaves_reservation_unchanged(
        reservation in reservation_strategy(),
        overshoot in 1u32..5,
    ) {
        prop_assume!(!reservation.entries().is_empty());
        let last = reservation.entries().last().unwrap();
        let mut releases: Vec<ReservationEntry> = reservation.entries().to_vec();
        releases.pop();
        releases.push(ReservationEntry::new(
            last.item.clone(),
            last.count + overshoot,
            last.storehouse.clone(),
        ));

        let mut attempted = reservation.clone();
        prop_assert!(attempted.release(&releases).is_err());
        prop_assert_eq!(attempted, reservation);
    }

    #[test]
    fn empty_release_is_a_no_op(reservation in reservation_strategy()) {
        let mut released = reservation.clone();
        released.release(&[]).unwrap();
        prop_assert_eq!(released, reservation);
    }
}
