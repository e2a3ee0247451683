//! Reserve operation planning.
//!
//! The planner allocates a request against the stock read through its
//! connection, applies the result to that stock and prices it. Nothing is
//! written; the plan carries the new stock levels and the reservation.

use rusqlite::Connection;

use crate::allocator::Allocator;
use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Effect, ReserveRequest};

use super::plan::{OperationPlan, PlanAction, PlanOutcome};

/// Options for a reserve operation.
#[derive(Debug, Clone)]
pub struct ReserveOptions {
    /// The items to reserve and where to deliver them.
    pub request: ReserveRequest,

    /// Persist a partial allocation, reporting every violation as a warning.
    pub allow_partial: bool,
}

impl ReserveOptions {
    /// Creates options that reject partial allocations.
    ///
    /// # Examples
    ///
    /// ```
    /// use depot::operations::ReserveOptions;
    /// use depot::{Coordinate, ReserveEntry, ReserveRequest};
    ///
    /// let request = ReserveRequest::new(
    ///     Coordinate::new(40.0, 40.0),
    ///     vec![ReserveEntry::unsourced("3", 5)],
    /// );
    /// let options = ReserveOptions::new(request).with_allow_partial(true);
    /// assert!(options.allow_partial);
    /// ```
    #[must_use]
    pub const fn new(request: ReserveRequest) -> Self {
        Self {
            request,
            allow_partial: false,
        }
    }

    /// Sets the `allow_partial` flag.
    #[must_use]
    pub const fn with_allow_partial(mut self, allow: bool) -> Self {
        self.allow_partial = allow;
        self
    }
}

/// Plans a reservation.
pub struct ReservePlan<'a> {
    options: ReserveOptions,
    config: &'a Config,
}

impl<'a> ReservePlan<'a> {
    /// Creates a planner. Partial allocations are accepted when either the
    /// options or the configuration allow them.
    #[must_use]
    pub const fn new(options: ReserveOptions, config: &'a Config) -> Self {
        Self { options, config }
    }

    fn allow_partial(&self) -> bool {
        self.options.allow_partial || self.config.allow_partial()
    }

    /// Builds the plan from the stock and catalog visible through `conn`.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the request breaks the caller contract
    /// - [`Error::Allocation`] if any unit could not be allocated and partial
    ///   allocations are not allowed, or if nothing at all was allocated
    /// - a database error if the snapshot cannot be read
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let request = &self.options.request;
        request.validate()?;

        let inventory = Database::load_inventory(conn)?;
        let catalog = Database::load_catalog(conn)?;

        let allocation = Allocator::default().build_reservation(request, &inventory);
        let mut plan = OperationPlan::new(format!(
            "Reserve {} entries for delivery to {}",
            request.entries.len(),
            request.destination
        ));

        if !allocation.is_complete() {
            if !self.allow_partial() {
                return Err(Error::Allocation(allocation.violations));
            }
            for violation in allocation.violations.iter() {
                plan = plan.add_warning(violation.to_string());
            }
        }

        let reservation = allocation.reservation;
        if reservation.entries().is_empty() {
            return Err(Error::Allocation(allocation.violations));
        }

        let reserved = reservation.apply_effect(&inventory, Effect::Reserve, &catalog)?;
        for storehouse in reserved.changed_since(&inventory) {
            plan = plan.add_action(PlanAction::ReplaceStock(storehouse.clone()));
        }

        let report = self
            .config
            .cost_model()
            .total_cost(&reservation, &inventory, &catalog);
        for violation in report.violations.iter() {
            plan = plan.add_warning(format!("cost: {violation}"));
        }

        log::debug!(
            "Planned reservation {}: {} entries, cost {:.2}",
            reservation.id(),
            reservation.entries().len(),
            report.total
        );

        Ok(plan
            .add_action(PlanAction::CreateReservation(reservation.clone()))
            .with_outcome(PlanOutcome {
                reservation: Some(reservation),
                total_cost: report.total,
            }))
    }
}
