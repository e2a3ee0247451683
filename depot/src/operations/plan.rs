//! Plan types for inventory operations.
//!
//! A plan describes every write an operation will make, plus the
//! reservation and cost the caller should report, without touching the
//! database.

use crate::inventory::Storehouse;
use crate::reservation::{Reservation, ReservationId};

/// A single write performed when a plan is executed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Overwrite a storehouse's stock rows with the given settled stock.
    ReplaceStock(Storehouse),

    /// Insert a new reservation.
    CreateReservation(Reservation),

    /// Rewrite the entries of an existing reservation.
    UpdateReservation(Reservation),

    /// Delete a reservation and its entries.
    DeleteReservation(ReservationId),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::ReplaceStock(storehouse) => format!(
                "Update stock of storehouse {} ({} item kinds, {} units)",
                storehouse.id,
                storehouse.stock.len(),
                storehouse.total_units()
            ),
            Self::CreateReservation(r) => format!(
                "Create reservation {} with {} entries ({} units)",
                r.id(),
                r.entries().len(),
                r.total_units()
            ),
            Self::UpdateReservation(r) => format!(
                "Update reservation {} to {} entries ({} units)",
                r.id(),
                r.entries().len(),
                r.total_units()
            ),
            Self::DeleteReservation(id) => format!("Delete reservation {id}"),
        }
    }
}

/// What the caller gets back once the plan is applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanOutcome {
    /// The reservation as persisted; `None` when it was deleted.
    pub reservation: Option<Reservation>,

    /// Transport cost of `reservation`; zero when there is none.
    pub total_cost: f64,
}

/// A complete operation plan.
///
/// # Examples
///
/// ```
/// use depot::operations::{OperationPlan, PlanAction};
/// use depot::ReservationId;
///
/// let plan = OperationPlan::new("Release reservation r1")
///     .add_action(PlanAction::DeleteReservation(ReservationId::from("r1")))
///     .add_warning("item 9 is not in the catalog");
///
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan.warnings.len(), 1);
/// assert!(plan.outcome.reservation.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// Writes to perform, in order.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,

    /// Result to report after execution.
    pub outcome: PlanOutcome,
}

impl OperationPlan {
    /// Creates an empty plan with the given description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
            outcome: PlanOutcome::default(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Sets the outcome reported after execution.
    #[must_use]
    pub fn with_outcome(mut self, outcome: PlanOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
