//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the depot data directory and database.

use clap::Args;
use depot::database::DATABASE_FILE_NAME;
use depot::operations::{init_database, InitOptions};

use crate::error::CliError;
use crate::utils::{data_dir, shorten_path, GlobalOptions};

/// Initialize the depot data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Overwrite an existing database
    #[arg(long)]
    pub overwrite: bool,

    /// Create a commented configuration file
    #[arg(long)]
    pub with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` has no effect here: initializing is the point.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = data_dir(global)?;

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_dry_run(self.dry_run);
        let result = init_database(&options)?;
        let shown = shorten_path(&result.data_dir);

        if result.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!("Would initialize depot in: {shown}");
            if result.data_dir_created {
                println!("  - Create data directory");
            }
            if self.overwrite {
                println!("  - Recreate database {DATABASE_FILE_NAME}");
            } else {
                println!("  - Create database {DATABASE_FILE_NAME}");
            }
            if result.config_created {
                println!("  - Create configuration file");
            }
            return Ok(());
        }

        if global.quiet {
            return Ok(());
        }

        println!("Initialized depot in: {shown}");
        if result.data_dir_created {
            println!("  - Created data directory");
        }
        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }
        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}
