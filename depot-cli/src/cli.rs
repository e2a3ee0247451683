//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    CompletionsCommand, InitCommand, ItemCommand, ListCommand, ReleaseCommand, ReserveCommand,
    ShowCommand, StockCommand, StorehouseCommand, UnreservedCommand,
};

/// Command-line tool for reserving stock across storehouses.
#[derive(Parser)]
#[command(name = "depot")]
#[command(version, about = "Reserve stock across geographically spread storehouses", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "DEPOT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the lock wait (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "DEPOT_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "DEPOT_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Manage the item catalog
    Item(ItemCommand),

    /// Manage storehouses
    Storehouse(StorehouseCommand),

    /// Manage stock levels
    Stock(StockCommand),

    /// Reserve items for delivery to a destination
    Reserve(ReserveCommand),

    /// Release a reservation in full or in part
    Release(ReleaseCommand),

    /// Show a reservation and its current cost
    Show(ShowCommand),

    /// List reservations
    List(ListCommand),

    /// Show unreserved stock of a storehouse
    Unreserved(UnreservedCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
