//! Layered configuration assembly.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};

/// Builds the effective [`Config`] from files, environment and
/// programmatic overrides.
///
/// # Examples
///
/// ```
/// use depot::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         maximum_lock_wait_seconds: Some(10),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
/// assert_eq!(config.maximum_lock_wait_seconds, Some(10));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    working_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads every layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts project file discovery here instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Reads the user configuration from this data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = Some(dir.to_path_buf());
        self
    }

    /// Ignores every configuration file.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores `DEPOT_*` environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Applies `config` on top of every other layer.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Loads, merges and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed, an environment variable
    /// is malformed, or the merged result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = if self.skip_files {
            Config::default()
        } else {
            let working_dir = match self.working_dir {
                Some(dir) => dir,
                None => env::current_dir().map_err(Error::Io)?,
            };
            let sources = ConfigLoader::load_all(&working_dir, self.data_dir.as_deref())?;
            for source in &sources {
                log::debug!(
                    "Loaded configuration from {} (precedence {})",
                    source.path.display(),
                    source.precedence
                );
            }
            ConfigMerger::merge(sources)
        };

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CostConfig;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_skip_everything_gives_defaults() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_local_file_overrides_project_file() {
        let project = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        fs::write(
            project.path().join("depot.yaml"),
            "cost:\n  distance_factor: 2.0\n  handling_surcharge: 10\n",
        )
        .unwrap();
        fs::write(
            project.path().join("depot.local.yaml"),
            "cost:\n  handling_surcharge: 20\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_working_dir(project.path())
            .with_data_dir(data.path())
            .skip_env()
            .build()
            .unwrap();

        let model = config.cost_model();
        assert_eq!(model.distance_factor, 2.0);
        assert_eq!(model.handling_surcharge, 20.0);
    }

    #[test]
    #[serial]
    fn test_environment_beats_files_and_overrides_beat_environment() {
        let project = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        fs::write(project.path().join("depot.yaml"), "maximum_lock_wait_seconds: 3\n").unwrap();
        env::set_var("DEPOT_MAXIMUM_LOCK_WAIT_SECONDS", "7");

        let from_env = ConfigBuilder::new()
            .with_working_dir(project.path())
            .with_data_dir(data.path())
            .build();
        let overridden = ConfigBuilder::new()
            .with_working_dir(project.path())
            .with_data_dir(data.path())
            .with_config(Config {
                maximum_lock_wait_seconds: Some(11),
                ..Config::default()
            })
            .build();
        env::remove_var("DEPOT_MAXIMUM_LOCK_WAIT_SECONDS");

        assert_eq!(from_env.unwrap().maximum_lock_wait_seconds, Some(7));
        assert_eq!(overridden.unwrap().maximum_lock_wait_seconds, Some(11));
    }

    #[test]
    fn test_invalid_result_rejected() {
        let result = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_config(Config {
                cost: Some(CostConfig {
                    metric_floor: Some(-1.0),
                    ..CostConfig::default()
                }),
                ..Config::default()
            })
            .build();
        assert!(result.is_err());
    }
}
