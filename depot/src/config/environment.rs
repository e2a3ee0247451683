//! Environment variable overrides (`DEPOT_*`).

use std::env;
use std::str::FromStr;

use crate::config::schema::{AllocationConfig, Config, CostConfig, OutputFormat};
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use depot::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Applies every `DEPOT_*` override that is set.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds a value that does not parse.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        Self::apply_cost_overrides(config)?;

        if let Ok(val) = env::var("DEPOT_ALLOW_PARTIAL") {
            let allocation = config
                .allocation
                .get_or_insert_with(AllocationConfig::default);
            allocation.allow_partial = Some(Self::parse_bool("DEPOT_ALLOW_PARTIAL", &val)?);
        }

        if let Ok(seconds) = env::var("DEPOT_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(seconds.trim().parse().map_err(|_| Error::Validation {
                    field: "DEPOT_MAXIMUM_LOCK_WAIT_SECONDS".into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        if let Ok(val) = env::var("DEPOT_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("DEPOT_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("DEPOT_OUTPUT_FORMAT") {
            config.output_format =
                Some(OutputFormat::from_str(&val).map_err(|message| Error::Validation {
                    field: "DEPOT_OUTPUT_FORMAT".into(),
                    message,
                })?);
        }

        Ok(())
    }

    fn apply_cost_overrides(config: &mut Config) -> Result<()> {
        let mut cost = config.cost.clone().unwrap_or_default();
        let mut modified = false;

        for (name, slot) in [
            ("DEPOT_DISTANCE_FACTOR", &mut cost.distance_factor),
            ("DEPOT_HANDLING_SURCHARGE", &mut cost.handling_surcharge),
            ("DEPOT_METRIC_FLOOR", &mut cost.metric_floor),
        ] {
            if let Ok(val) = env::var(name) {
                *slot = Some(Self::parse_f64(name, &val)?);
                modified = true;
            }
        }

        if modified {
            config.cost = Some(cost);
        }
        Ok(())
    }

    fn parse_f64(field: &str, s: &str) -> Result<f64> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Invalid number: '{s}'"),
        })
    }

    /// Parses a boolean flag value.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}

/// Every variable read by [`EnvironmentConfig::apply_overrides`].
pub const ENVIRONMENT_VARIABLES: [&str; 7] = [
    "DEPOT_DISTANCE_FACTOR",
    "DEPOT_HANDLING_SURCHARGE",
    "DEPOT_METRIC_FLOOR",
    "DEPOT_ALLOW_PARTIAL",
    "DEPOT_MAXIMUM_LOCK_WAIT_SECONDS",
    "DEPOT_DISABLE_AUTOINIT",
    "DEPOT_OUTPUT_FORMAT",
];
