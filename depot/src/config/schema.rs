//! Configuration schema definitions.
//!
//! Every field is optional so that layers can be merged: a value missing
//! from one file falls through to the next lower layer and finally to the
//! built-in default exposed by the accessor methods on [`Config`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cost::{
    CostModel, DEFAULT_DISTANCE_FACTOR, DEFAULT_HANDLING_SURCHARGE, DEFAULT_METRIC_FLOOR,
};

/// Default time to wait for the database write lock.
pub const DEFAULT_MAXIMUM_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use depot::config::{AllocationConfig, Config};
///
/// let config = Config {
///     allocation: Some(AllocationConfig {
///         allow_partial: Some(true),
///     }),
///     ..Default::default()
/// };
/// assert!(config.allow_partial());
/// assert_eq!(config.cost_model().handling_surcharge, 1000.0);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Transport cost coefficients.
    pub cost: Option<CostConfig>,

    /// Allocation policy.
    pub allocation: Option<AllocationConfig>,

    /// Maximum time to wait for the database write lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Refuse to create a missing data directory and database.
    pub disable_autoinit: Option<bool>,

    /// Output format for reservation commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The cost model, with defaults for every unset coefficient.
    #[must_use]
    pub fn cost_model(&self) -> CostModel {
        let cost = self.cost.clone().unwrap_or_default();
        CostModel {
            distance_factor: cost.distance_factor.unwrap_or(DEFAULT_DISTANCE_FACTOR),
            handling_surcharge: cost.handling_surcharge.unwrap_or(DEFAULT_HANDLING_SURCHARGE),
            metric_floor: cost.metric_floor.unwrap_or(DEFAULT_METRIC_FLOOR),
        }
    }

    /// Whether a partial allocation may be persisted. Defaults to false.
    #[must_use]
    pub fn allow_partial(&self) -> bool {
        self.allocation
            .as_ref()
            .and_then(|a| a.allow_partial)
            .unwrap_or(false)
    }

    /// The lock wait as a duration. Defaults to five seconds.
    #[must_use]
    pub fn maximum_lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_MAXIMUM_LOCK_WAIT_SECONDS),
        )
    }

    /// Whether automatic initialization is disabled. Defaults to false.
    #[must_use]
    pub fn disable_autoinit(&self) -> bool {
        self.disable_autoinit.unwrap_or(false)
    }

    /// The configured output format. Defaults to human.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }
}

/// Cost coefficients; see [`CostModel`].
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    /// Multiplier on distance times metric.
    pub distance_factor: Option<f64>,
    /// Flat charge per storehouse touched.
    pub handling_surcharge: Option<f64>,
    /// Substitute magnitude for items with no weight and no volume.
    pub metric_floor: Option<f64>,
}

/// Allocation policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AllocationConfig {
    /// Persist partial allocations, reporting violations as warnings.
    pub allow_partial: Option<bool>,
}

/// Output format for reservation commands.
///
/// # Examples
///
/// ```
/// use depot::config::OutputFormat;
///
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// assert_eq!(OutputFormat::default(), OutputFormat::Human);
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// JSON document.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid output format: {s} (expected human or json)")),
        }
    }
}
