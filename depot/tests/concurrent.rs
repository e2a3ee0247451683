//! Concurrent reservations against one database file.
//!
//! Each thread opens its own connection, as separate processes would, and
//! runs plan and execute inside an IMMEDIATE transaction. The write lock
//! serializes them, so stock can never be sold twice.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::{config, release, request, reserve, stored, TestDepot};
use depot::operations::ReserveOptions;
use depot::{Database, DatabaseConfig, Error, ReserveEntry};

const THREADS: usize = 12;

fn open_patient(depot: &TestDepot) -> Database {
    Database::open(DatabaseConfig::new(depot.path()).with_busy_timeout(Duration::from_secs(30)))
        .unwrap()
}

#[test]
fn test_concurrent_reservations_never_oversell() {
    let depot = Arc::new(TestDepot::seeded());
    let barrier = Arc::new(Barrier::new(THREADS));

    // 20 crates in total; 12 threads asking for 3 each can satisfy 6.
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let depot = Arc::clone(&depot);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut db = open_patient(&depot);
                let config = config();
                barrier.wait();
                reserve(
                    &mut db,
                    &config,
                    ReserveOptions::new(request(58.0, vec![ReserveEntry::unsourced("crate", 3)])),
                )
            })
        })
        .collect();

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(result) => {
                assert_eq!(result.reservation.unwrap().total_units(), 3);
                succeeded += 1;
            }
            Err(Error::Allocation(violations)) => {
                assert!(!violations.is_empty());
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(succeeded, 6);
    assert_eq!(rejected, THREADS - 6);

    let db = depot.open();
    let reserved: u64 = Database::list_reservations(db.connection())
        .unwrap()
        .iter()
        .map(|s| s.total_units)
        .sum();
    assert_eq!(reserved, 18);
    let left: u32 = ["north", "middle", "south"]
        .iter()
        .map(|s| stored(&db, s, "crate"))
        .sum();
    assert_eq!(left, 2);
}

#[test]
fn test_concurrent_release_and_reserve_balance() {
    let depot = Arc::new(TestDepot::seeded());
    let mut db = depot.open();
    let config = config();

    let ids: Vec<_> = (0..4)
        .map(|_| {
            reserve(
                &mut db,
                &config,
                ReserveOptions::new(request(60.0, vec![ReserveEntry::unsourced("crate", 5)])),
            )
            .unwrap()
            .reservation
            .unwrap()
            .id()
            .clone()
        })
        .collect();
    drop(db);

    let releasers: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let depot = Arc::clone(&depot);
            thread::spawn(move || {
                let mut db = open_patient(&depot);
                release(&mut db, &common::config(), &id, Vec::new()).unwrap();
            })
        })
        .collect();
    for handle in releasers {
        handle.join().unwrap();
    }

    let db = depot.open();
    assert!(Database::list_reservations(db.connection())
        .unwrap()
        .is_empty());
    assert_eq!(stored(&db, "north", "crate"), 10);
    assert_eq!(stored(&db, "middle", "crate"), 4);
    assert_eq!(stored(&db, "south", "crate"), 6);
}
