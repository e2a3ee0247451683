//! Common helpers for library integration tests.
//!
//! Every test gets its own data directory holding a database seeded with
//! a small catalog and three storehouses along the same meridian.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use depot::config::{Config, ConfigBuilder};
use depot::operations::{
    ExecutionResult, PlanExecutor, ReleaseOptions, ReleasePlan, ReserveOptions, ReservePlan,
};
use depot::{
    Coordinate, Database, DatabaseConfig, Item, ReservationEntry, ReservationId, ReserveEntry,
    ReserveRequest, Result, Size, Storehouse,
};

/// An isolated depot database.
pub struct TestDepot {
    _dir: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl TestDepot {
    /// Creates an empty database in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depot.db");
        Database::open(DatabaseConfig::new(&path)).unwrap();
        Self { _dir: dir, path }
    }

    /// Creates a database holding the standard catalog and storehouses.
    pub fn seeded() -> Self {
        let depot = Self::new();
        seed(&depot.open());
        depot
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a new connection to the database.
    pub fn open(&self) -> Database {
        Database::open(DatabaseConfig::new(&self.path)).unwrap()
    }
}

/// Items `crate`, `barrel` and `feather` (weightless and flat).
pub fn items() -> Vec<Item> {
    vec![
        Item::new("crate", "Crate", Size::new(1.0, 1.0, 1.0), 20.0),
        Item::new("barrel", "Barrel", Size::new(0.6, 0.6, 1.0), 80.0),
        Item::new("feather", "Feather", Size::new(0.1, 0.1, 0.0), 0.0),
    ]
}

/// Storehouses `north` (10 crates, 2 barrels), `middle` (4 crates) and
/// `south` (6 crates, 5 feathers) at latitudes 60, 55 and 50.
pub fn storehouses() -> Vec<Storehouse> {
    let items = items();
    vec![
        Storehouse::new("north", "North", Coordinate::new(60.0, 10.0))
            .with_stock(items[0].clone(), 10)
            .with_stock(items[1].clone(), 2),
        Storehouse::new("middle", "Middle", Coordinate::new(55.0, 10.0))
            .with_stock(items[0].clone(), 4),
        Storehouse::new("south", "South", Coordinate::new(50.0, 10.0))
            .with_stock(items[0].clone(), 6)
            .with_stock(items[2].clone(), 5),
    ]
}

pub fn seed(db: &Database) {
    let conn = db.connection();
    for item in items() {
        Database::upsert_item(conn, &item).unwrap();
    }
    for storehouse in storehouses() {
        Database::upsert_storehouse(conn, &storehouse).unwrap();
        Database::replace_stock(conn, &storehouse).unwrap();
    }
}

/// Configuration with files and environment ignored.
#[allow(dead_code)]
pub fn config() -> Config {
    ConfigBuilder::new().skip_files().skip_env().build().unwrap()
}

/// Configuration with files and environment ignored, `overrides` on top.
#[allow(dead_code)]
pub fn config_with(overrides: Config) -> Config {
    ConfigBuilder::new()
        .skip_files()
        .skip_env()
        .with_config(overrides)
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn request(latitude: f64, entries: Vec<ReserveEntry>) -> ReserveRequest {
    ReserveRequest::new(Coordinate::new(latitude, 10.0), entries)
}

/// Plans and executes a reservation in one IMMEDIATE transaction.
#[allow(dead_code)]
pub fn reserve(
    db: &mut Database,
    config: &Config,
    options: ReserveOptions,
) -> Result<ExecutionResult> {
    let tx = db.begin_transaction()?;
    let plan = ReservePlan::new(options, config).build_plan(&tx)?;
    let result = PlanExecutor::new(&tx).execute(&plan)?;
    tx.commit()?;
    Ok(result)
}

/// Plans and executes a release in one IMMEDIATE transaction.
#[allow(dead_code)]
pub fn release(
    db: &mut Database,
    config: &Config,
    id: &ReservationId,
    items: Vec<ReservationEntry>,
) -> Result<ExecutionResult> {
    let tx = db.begin_transaction()?;
    let options = ReleaseOptions::new(id.clone()).with_items(items);
    let plan = ReleasePlan::new(options, config).build_plan(&tx)?;
    let result = PlanExecutor::new(&tx).execute(&plan)?;
    tx.commit()?;
    Ok(result)
}

/// Stock of one item in one storehouse as stored.
#[allow(dead_code)]
pub fn stored(db: &Database, storehouse: &str, item: &str) -> u32 {
    Database::load_inventory(db.connection())
        .unwrap()
        .available(&storehouse.into(), &item.into())
}
