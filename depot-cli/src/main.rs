//! Main entry point for the depot CLI.
//!
//! Commands:
//! - `init`: Create the data directory and database
//! - `item`, `storehouse`, `stock`: Maintain the catalog and stock
//! - `reserve`, `release`: Reserve and return items
//! - `show`, `list`, `unreserved`: Inspect reservations and stock

mod cli;
mod commands;
mod error;
mod report;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Usage errors exit with 4; help and version exit cleanly.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(4);
        }
        Err(e) => e.exit(),
    };

    let _installed = depot::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Item(cmd) => cmd.execute(&global),
        cli::Command::Storehouse(cmd) => cmd.execute(&global),
        cli::Command::Stock(cmd) => cmd.execute(&global),
        cli::Command::Reserve(cmd) => cmd.execute(&global),
        cli::Command::Release(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Unreserved(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
