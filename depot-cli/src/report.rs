//! Rendering of reservation reports for `reserve`, `release` and `show`.

use std::io::Write;

use depot::{Reservation, ReservationId};
use serde_json::json;

use crate::error::CliError;
use crate::utils::ReportFormat;

/// What a command has to say about one reservation.
pub struct Report<'a> {
    /// The reservation the command acted on.
    pub id: &'a ReservationId,
    /// The reservation as it now stands; `None` once fully released.
    pub reservation: Option<&'a Reservation>,
    /// Transport cost of `reservation`.
    pub total_cost: f64,
    /// Warnings raised while planning or pricing.
    pub warnings: &'a [String],
    /// Whether nothing was written.
    pub dry_run: bool,
    /// Planned actions, listed for dry runs.
    pub actions: &'a [String],
}

impl Report<'_> {
    /// The report as a JSON document.
    pub fn to_json(&self) -> serde_json::Value {
        let mut doc = json!({
            "id": self.id,
            "released": self.reservation.is_none(),
            "total_cost": self.total_cost,
            "warnings": self.warnings,
            "dry_run": self.dry_run,
        });
        if let Some(reservation) = self.reservation {
            doc["destination"] = json!(reservation.destination());
            doc["state"] = json!(reservation.state());
            doc["entries"] = json!(reservation.entries());
            doc["total_units"] = json!(reservation.total_units());
            doc["released_units"] = json!(reservation.released_units());
        }
        if self.dry_run {
            doc["actions"] = json!(self.actions);
        }
        doc
    }

    /// Prints the report to stdout. Human output sends warnings and
    /// dry-run actions to stderr unless `quiet`.
    pub fn print(&self, format: ReportFormat, quiet: bool) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        if format == ReportFormat::Json {
            serde_json::to_writer_pretty(&mut out, &self.to_json())?;
            writeln!(out)?;
            return Ok(());
        }

        if self.dry_run && !quiet {
            eprintln!("Dry run - would perform the following actions:");
            for (i, action) in self.actions.iter().enumerate() {
                eprintln!("  {}. {action}", i + 1);
            }
        }

        match self.reservation {
            Some(reservation) => {
                writeln!(out, "Reservation {} ({})", self.id, reservation.state())?;
                writeln!(out, "Destination: {}", reservation.destination())?;
                for entry in reservation.entries() {
                    writeln!(
                        out,
                        "  {}\t{}\t{}",
                        entry.item, entry.count, entry.storehouse
                    )?;
                }
                if reservation.released_units() > 0 {
                    writeln!(out, "Released units: {}", reservation.released_units())?;
                }
                writeln!(out, "Total cost: {:.2}", self.total_cost)?;
            }
            None => writeln!(out, "Reservation {} released", self.id)?,
        }

        if !quiet {
            for warning in self.warnings {
                eprintln!("Warning: {warning}");
            }
        }
        Ok(())
    }
}
