//! Configuration validation.

use crate::config::schema::{Config, CostConfig};
use crate::error::{Error, Result};

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use depot::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates every field that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref cost) = config.cost {
            Self::validate_cost(cost)?;
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::Validation {
                field: "maximum_lock_wait_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_cost(cost: &CostConfig) -> Result<()> {
        for (field, value) in [
            ("cost.distance_factor", cost.distance_factor),
            ("cost.handling_surcharge", cost.handling_surcharge),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::Validation {
                        field: field.into(),
                        message: format!("Must be a finite, non-negative number (got {value})"),
                    });
                }
            }
        }

        if let Some(floor) = cost.metric_floor {
            if !floor.is_finite() || floor <= 0.0 {
                return Err(Error::Validation {
                    field: "cost.metric_floor".into(),
                    message: format!("Must be a finite number greater than 0 (got {floor})"),
                });
            }
        }

        Ok(())
    }
}
