//! Plan execution engine.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::Reservation;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The reservation as persisted, absent when it was deleted.
    pub reservation: Option<Reservation>,

    /// Transport cost of `reservation`.
    pub total_cost: f64,
}

impl ExecutionResult {
    fn from_plan(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: plan.outcome.reservation.clone(),
            total_cost: plan.outcome.total_cost,
        }
    }
}

/// Applies operation plans through a connection.
///
/// The connection is normally the transaction the plan was built in, so
/// the read and the writes are one atomic unit.
///
/// # Examples
///
/// ```no_run
/// use depot::config::ConfigBuilder;
/// use depot::operations::{PlanExecutor, ReserveOptions, ReservePlan};
/// use depot::{Coordinate, Database, DatabaseConfig, ReserveEntry, ReserveRequest};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/depot.db")).unwrap();
/// let config = ConfigBuilder::new().build().unwrap();
/// let request = ReserveRequest::new(
///     Coordinate::new(40.0, 40.0),
///     vec![ReserveEntry::unsourced("3", 5)],
/// );
///
/// let tx = db.begin_transaction().unwrap();
/// let plan = ReservePlan::new(ReserveOptions::new(request), &config)
///     .build_plan(&tx)
///     .unwrap();
/// let result = PlanExecutor::new(&tx).execute(&plan).unwrap();
/// tx.commit().unwrap();
/// assert!(result.success);
/// ```
pub struct PlanExecutor<'a> {
    conn: &'a Connection,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            dry_run: false,
        }
    }

    /// Reports the plan without writing anything.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// Actions run in plan order. The executor does not roll back on its
    /// own; a failure leaves the rollback to the enclosing transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails, or [`Error::NotFound`] if an
    /// update or delete targets a reservation that no longer exists.
    pub fn execute(&self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            log::debug!("Dry run of '{}': {} actions", plan.description, plan.len());
            return Ok(ExecutionResult::from_plan(plan, true));
        }

        for action in &plan.actions {
            log::debug!("{}", action.description());
            self.execute_action(action)?;
        }

        Ok(ExecutionResult::from_plan(plan, false))
    }

    fn execute_action(&self, action: &PlanAction) -> Result<()> {
        match action {
            PlanAction::ReplaceStock(storehouse) => Database::replace_stock(self.conn, storehouse),
            PlanAction::CreateReservation(reservation) => {
                Database::insert_reservation(self.conn, reservation)
            }
            PlanAction::UpdateReservation(reservation) => {
                if Database::update_reservation(self.conn, reservation)? {
                    Ok(())
                } else {
                    Err(Error::NotFound {
                        resource: format!("reservation {}", reservation.id()),
                    })
                }
            }
            PlanAction::DeleteReservation(id) => {
                if Database::delete_reservation(self.conn, id)? {
                    Ok(())
                } else {
                    Err(Error::NotFound {
                        resource: format!("reservation {id}"),
                    })
                }
            }
        }
    }
}
