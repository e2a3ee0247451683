//! Show command implementation.

use clap::Args;
use depot::operations::quote;
use depot::ReservationId;

use crate::error::CliError;
use crate::report::Report;
use crate::utils::{load_configuration, open_database, GlobalOptions, ReportFormat};

/// Show a reservation and its current transport cost.
#[derive(Args)]
pub struct ShowCommand {
    /// Reservation identifier
    #[arg(long, value_name = "ID")]
    pub reservation: String,

    /// Output format (defaults to the configured output_format)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<ReportFormat>,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = ReportFormat::resolve(self.format, &config);
        let db = open_database(global, &config)?;

        let id = ReservationId::new(self.reservation);
        let priced = quote(db.connection(), &id, &config.cost_model())?;
        let warnings: Vec<String> = priced
            .report
            .violations
            .iter()
            .map(|v| format!("cost: {v}"))
            .collect();

        Report {
            id: &id,
            reservation: Some(&priced.reservation),
            total_cost: priced.report.total,
            warnings: &warnings,
            dry_run: false,
            actions: &[],
        }
        .print(format, global.quiet)
    }
}
