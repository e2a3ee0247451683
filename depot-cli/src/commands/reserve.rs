//! Reserve command implementation.
//!
//! This module implements the `reserve` command, which allocates the
//! requested items from the nearest storehouses and records a reservation.

use clap::Args;
use depot::{Coordinate, PlanExecutor, ReserveEntry, ReserveOptions, ReservePlan, ReserveRequest};

use crate::error::CliError;
use crate::report::Report;
use crate::utils::{load_configuration, open_database, parse_reserve_entry, GlobalOptions, ReportFormat};

/// Reserve items for delivery to a destination.
#[derive(Args)]
pub struct ReserveCommand {
    /// Destination latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Destination longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Requested items as ITEM:COUNT, or ITEM:COUNT@STOREHOUSE to pin the source
    #[arg(long = "entry", value_name = "ITEM:COUNT[@STOREHOUSE]", required = true, value_parser = parse_reserve_entry)]
    pub entries: Vec<ReserveEntry>,

    /// Keep what could be allocated when the request cannot be met in full
    #[arg(long)]
    pub allow_partial: bool,

    /// Plan the reservation without recording it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (defaults to the configured output_format)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<ReportFormat>,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = ReportFormat::resolve(self.format, &config);

        let request = ReserveRequest::new(
            Coordinate::new(self.latitude, self.longitude),
            self.entries,
        );
        let options = ReserveOptions::new(request).with_allow_partial(self.allow_partial);

        let mut db = open_database(global, &config)?;

        // Plan and execute under one write lock.
        let tx = db.begin_transaction()?;
        let plan = ReservePlan::new(options, &config).build_plan(&tx)?;
        let mut executor = PlanExecutor::new(&tx);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan)?;
        if !self.dry_run {
            tx.commit().map_err(depot::Error::from)?;
        }

        let Some(reservation) = result.reservation.as_ref() else {
            return Err(CliError::Library(depot::Error::NotFound {
                resource: "reservation in plan outcome".into(),
            }));
        };
        Report {
            id: reservation.id(),
            reservation: Some(reservation),
            total_cost: result.total_cost,
            warnings: &result.warnings,
            dry_run: result.dry_run,
            actions: &result.actions_taken,
        }
        .print(format, global.quiet)
    }
}
