//! Release operation planning.

use rusqlite::Connection;

use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Effect, ReservationEntry, ReservationId};

use super::plan::{OperationPlan, PlanAction, PlanOutcome};

/// Options for a release operation.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// The reservation to release from.
    pub reservation_id: ReservationId,

    /// Units to release per (item, storehouse). Empty releases everything.
    pub items: Vec<ReservationEntry>,
}

impl ReleaseOptions {
    /// Creates options that release the whole reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use depot::operations::ReleaseOptions;
    /// use depot::ReservationEntry;
    ///
    /// let all = ReleaseOptions::new("r1".into());
    /// assert!(all.items.is_empty());
    ///
    /// let some = all.with_items(vec![ReservationEntry::new("3", 2, "a")]);
    /// assert_eq!(some.items.len(), 1);
    /// ```
    #[must_use]
    pub const fn new(reservation_id: ReservationId) -> Self {
        Self {
            reservation_id,
            items: Vec::new(),
        }
    }

    /// Releases only the given units.
    #[must_use]
    pub fn with_items(mut self, items: Vec<ReservationEntry>) -> Self {
        self.items = items;
        self
    }
}

/// Plans a full or partial release.
///
/// The stored reservation is first returned to stock as a whole; what
/// remains after the release is then taken again. A release that leaves
/// no entries deletes the reservation.
pub struct ReleasePlan<'a> {
    options: ReleaseOptions,
    config: &'a Config,
}

impl<'a> ReleasePlan<'a> {
    /// Creates a planner.
    #[must_use]
    pub const fn new(options: ReleaseOptions, config: &'a Config) -> Self {
        Self { options, config }
    }

    /// Builds the plan from the state visible through `conn`.
    ///
    /// Every release item is checked before anything is planned, so a
    /// rejected release leaves both the reservation and the stock as they
    /// were.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation does not exist
    /// - [`Error::Inventory`] if a release item exceeds or misses the
    ///   reservation's entries, or a storehouse has disappeared
    /// - a database error if the snapshot cannot be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use depot::config::Config;
    /// use depot::operations::{ReleaseOptions, ReleasePlan};
    /// use depot::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/depot.db")).unwrap();
    /// let config = Config::default();
    /// let tx = db.begin_transaction().unwrap();
    /// let plan = ReleasePlan::new(ReleaseOptions::new("r1".into()), &config)
    ///     .build_plan(&tx)
    ///     .unwrap();
    /// assert!(plan.outcome.reservation.is_none());
    /// ```
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let id = &self.options.reservation_id;
        let stored = Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })?;

        let inventory = Database::load_inventory(conn)?;
        let catalog = Database::load_catalog(conn)?;

        let mut plan = OperationPlan::new(if self.options.items.is_empty() {
            format!("Release reservation {id}")
        } else {
            format!(
                "Release {} entries from reservation {id}",
                self.options.items.len()
            )
        });

        for entry in stored.entries() {
            let stocked = inventory
                .get(&entry.storehouse)
                .is_some_and(|s| s.stock.contains_key(&entry.item));
            if !stocked && !catalog.contains_key(&entry.item) {
                plan = plan.add_warning(format!(
                    "item {} is not in the catalog; {} units not returned to storehouse {}",
                    entry.item, entry.count, entry.storehouse
                ));
            }
        }

        let released = stored.apply_effect(&inventory, Effect::Release, &catalog)?;

        let residual = if self.options.items.is_empty() {
            None
        } else {
            let mut residual = stored.clone();
            residual.release(&self.options.items)?;
            Some(residual).filter(|r| !r.entries().is_empty())
        };

        let (settled, reservation_action, outcome) = match residual {
            None => (
                released,
                PlanAction::DeleteReservation(id.clone()),
                PlanOutcome::default(),
            ),
            Some(residual) => {
                let settled = residual.apply_effect(&released, Effect::Reserve, &catalog)?;
                let report = self
                    .config
                    .cost_model()
                    .total_cost(&residual, &settled, &catalog);
                for violation in report.violations.iter() {
                    plan = plan.add_warning(format!("cost: {violation}"));
                }
                (
                    settled,
                    PlanAction::UpdateReservation(residual.clone()),
                    PlanOutcome {
                        reservation: Some(residual),
                        total_cost: report.total,
                    },
                )
            }
        };

        for storehouse in settled.changed_since(&inventory) {
            plan = plan.add_action(PlanAction::ReplaceStock(storehouse.clone()));
        }

        log::debug!(
            "Planned release of {id}: {} units remain",
            outcome.reservation.as_ref().map_or(0, |r| r.total_units())
        );

        Ok(plan.add_action(reservation_action).with_outcome(outcome))
    }
}
