//! Build script for depot-cli.
//!
//! Generates the `depot.1` man page with clap_mangen into OUT_DIR.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is restated here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("depot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reserve stock across geographically spread storehouses")
        .long_about(
            "Command-line tool that allocates requested items from the nearest \
             storehouses, prices the transport and tracks reservations until they \
             are released",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("DEPOT_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the lock wait (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("DEPOT_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("DEPOT_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the data directory, the database and optionally a configuration file"),
            Command::new("item")
                .about("Manage the item catalog")
                .long_about("Add items with their dimensions and weight, or list the catalog"),
            Command::new("storehouse")
                .about("Manage storehouses")
                .long_about("Add storehouses with their location, or list them with stock totals"),
            Command::new("stock")
                .about("Manage stock levels")
                .long_about("Set the unreserved count of an item in a storehouse"),
            Command::new("reserve")
                .about("Reserve items for delivery to a destination")
                .long_about(
                    "Allocate ITEM:COUNT entries from the nearest storehouses, or from a \
                     pinned storehouse with ITEM:COUNT@STOREHOUSE, and record the reservation",
                ),
            Command::new("release")
                .about("Release a reservation in full or in part")
                .long_about("Return reserved units to stock; without entries the whole reservation is released"),
            Command::new("show")
                .about("Show a reservation and its current cost")
                .long_about("Display the entries of a reservation priced against the current storehouses"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display reservation summaries in table, JSON, CSV or TSV format"),
            Command::new("unreserved")
                .about("Show unreserved stock of a storehouse")
                .long_about("Display the stock of a storehouse not held by any reservation"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("depot.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
