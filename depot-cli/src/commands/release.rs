//! Release command implementation.
//!
//! This module implements the `release` command, which returns all or
//! part of a reservation to stock.

use clap::Args;
use depot::{PlanExecutor, ReleaseOptions, ReleasePlan, ReservationEntry, ReservationId};

use crate::error::CliError;
use crate::report::Report;
use crate::utils::{load_configuration, open_database, parse_release_entry, GlobalOptions, ReportFormat};

/// Release a reservation, in full or in part.
#[derive(Args)]
pub struct ReleaseCommand {
    /// Reservation identifier
    #[arg(long, value_name = "ID")]
    pub reservation: String,

    /// Units to release as ITEM:COUNT@STOREHOUSE; none releases everything
    #[arg(long = "entry", value_name = "ITEM:COUNT@STOREHOUSE", value_parser = parse_release_entry)]
    pub entries: Vec<ReservationEntry>,

    /// Plan the release without recording it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (defaults to the configured output_format)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<ReportFormat>,
}

impl ReleaseCommand {
    /// Execute the release command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = ReportFormat::resolve(self.format, &config);

        let id = ReservationId::new(self.reservation);
        let options = ReleaseOptions::new(id.clone()).with_items(self.entries);

        let mut db = open_database(global, &config)?;

        let tx = db.begin_transaction()?;
        let plan = ReleasePlan::new(options, &config).build_plan(&tx)?;
        let mut executor = PlanExecutor::new(&tx);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan)?;
        if !self.dry_run {
            tx.commit().map_err(depot::Error::from)?;
        }

        Report {
            id: &id,
            reservation: result.reservation.as_ref(),
            total_cost: result.total_cost,
            warnings: &result.warnings,
            dry_run: result.dry_run,
            actions: &result.actions_taken,
        }
        .print(format, global.quiet)
    }
}
