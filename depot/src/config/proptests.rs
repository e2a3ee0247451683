//! Property-based tests for configuration merging and validation.

use super::merger::ConfigMerger;
use super::schema::{AllocationConfig, Config, CostConfig};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn cost_strategy() -> impl Strategy<Value = CostConfig> {
    (
        prop::option::of(0.0f64..10.0),
        prop::option::of(0.0f64..5000.0),
        prop::option::of(0.01f64..10.0),
    )
        .prop_map(|(distance_factor, handling_surcharge, metric_floor)| CostConfig {
            distance_factor,
            handling_surcharge,
            metric_floor,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(cost_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..600),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(cost, allow_partial, lock_wait, autoinit)| Config {
            cost,
            allocation: allow_partial.map(|p| AllocationConfig {
                allow_partial: Some(p),
            }),
            maximum_lock_wait_seconds: lock_wait,
            disable_autoinit: autoinit,
            output_format: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn merging_into_default_is_identity(config in config_strategy()) {
        let mut merged = Config::default();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    #[test]
    fn higher_layer_wins_where_set(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        let expect_lock = high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds);
        prop_assert_eq!(merged.maximum_lock_wait_seconds, expect_lock);

        let expect_surcharge = high.cost.as_ref().and_then(|c| c.handling_surcharge)
            .or_else(|| low.cost.as_ref().and_then(|c| c.handling_surcharge));
        prop_assert_eq!(merged.cost.and_then(|c| c.handling_surcharge), expect_surcharge);
    }

    #[test]
    fn merging_valid_configs_stays_valid(low in config_strategy(), high in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&low).is_ok());
        prop_assert!(ConfigValidator::validate(&high).is_ok());
        let mut merged = low;
        ConfigMerger::merge_into(&mut merged, &high);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }

    #[test]
    fn negative_coefficients_never_validate(factor in -1000.0f64..-0.001) {
        let config = Config {
            cost: Some(CostConfig { distance_factor: Some(factor), ..CostConfig::default() }),
            ..Config::default()
        };
        prop_assert!(ConfigValidator::validate(&config).is_err());
    }
}
