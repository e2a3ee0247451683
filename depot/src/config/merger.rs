//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{AllocationConfig, Config, CostConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use depot::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(20), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(20));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources ordered from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; every field set in `source` wins.
    ///
    /// The `cost` and `allocation` sections merge field by field, so a file
    /// overriding only the surcharge keeps the distance factor from below.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if let Some(ref cost) = source.cost {
            Self::merge_cost(target.cost.get_or_insert_with(CostConfig::default), cost);
        }

        if let Some(ref allocation) = source.allocation {
            Self::merge_allocation(
                target
                    .allocation
                    .get_or_insert_with(AllocationConfig::default),
                allocation,
            );
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }
    }

    fn merge_cost(target: &mut CostConfig, source: &CostConfig) {
        if source.distance_factor.is_some() {
            target.distance_factor = source.distance_factor;
        }
        if source.handling_surcharge.is_some() {
            target.handling_surcharge = source.handling_surcharge;
        }
        if source.metric_floor.is_some() {
            target.metric_floor = source.metric_floor;
        }
    }

    fn merge_allocation(target: &mut AllocationConfig, source: &AllocationConfig) {
        if source.allow_partial.is_some() {
            target.allow_partial = source.allow_partial;
        }
    }
}
