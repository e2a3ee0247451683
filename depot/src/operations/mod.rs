//! Inventory operations using the plan-execute pattern.
//!
//! Planners read a snapshot through a connection and return an
//! [`OperationPlan`]; [`PlanExecutor`] writes it. Run both inside one
//! [`Database::begin_transaction`](crate::Database::begin_transaction) so
//! that concurrent reservations against the same storehouse serialize on
//! the write lock instead of overselling.
//!
//! # Examples
//!
//! ```no_run
//! use depot::config::ConfigBuilder;
//! use depot::operations::{PlanExecutor, ReleaseOptions, ReleasePlan, ReserveOptions, ReservePlan};
//! use depot::{Coordinate, Database, DatabaseConfig, ReserveEntry, ReserveRequest};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/depot.db")).unwrap();
//! let config = ConfigBuilder::new().build().unwrap();
//!
//! let request = ReserveRequest::new(
//!     Coordinate::new(40.0, 40.0),
//!     vec![ReserveEntry::unsourced("3", 5)],
//! );
//! let tx = db.begin_transaction().unwrap();
//! let plan = ReservePlan::new(ReserveOptions::new(request), &config)
//!     .build_plan(&tx)
//!     .unwrap();
//! let reserved = PlanExecutor::new(&tx).execute(&plan).unwrap();
//! tx.commit().unwrap();
//!
//! let id = reserved.reservation.unwrap().id().clone();
//! let tx = db.begin_transaction().unwrap();
//! let plan = ReleasePlan::new(ReleaseOptions::new(id), &config)
//!     .build_plan(&tx)
//!     .unwrap();
//! PlanExecutor::new(&tx).execute(&plan).unwrap();
//! tx.commit().unwrap();
//! ```

pub mod executor;
pub mod init;
pub mod plan;
pub mod quote;
pub mod release;
pub mod reserve;
pub mod unreserved;

pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult, DEFAULT_CONFIG_TEMPLATE};
pub use plan::{OperationPlan, PlanAction, PlanOutcome};
pub use quote::{quote, Quote};
pub use release::{ReleaseOptions, ReleasePlan};
pub use reserve::{ReserveOptions, ReservePlan};
pub use unreserved::unreserved_stock;
