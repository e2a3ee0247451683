//! Layered configuration.
//!
//! Sources, from highest to lowest precedence:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`DEPOT_*`)
//! 3. Private project config (`depot.local.yaml`)
//! 4. Project config (`depot.yaml`)
//! 5. User config (`<data_dir>/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use depot::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/warehouse"))
//!     .build()
//!     .unwrap();
//! println!("Surcharge: {}", config.cost_model().handling_surcharge);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::{EnvironmentConfig, ENVIRONMENT_VARIABLES};
pub use loader::{ConfigLoader, ConfigSource, LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE, USER_CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::{
    AllocationConfig, Config, CostConfig, OutputFormat, DEFAULT_MAXIMUM_LOCK_WAIT_SECONDS,
};
pub use validator::ConfigValidator;
