//! Data directory initialization.

use std::fs;
use std::path::PathBuf;

use crate::config::USER_CONFIG_FILE;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};

/// Options for data directory initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a commented configuration template.
    pub create_config: bool,
    /// Report what would be created without touching the filesystem.
    pub dry_run: bool,
}

impl InitOptions {
    /// Creates options for the given data directory.
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            dry_run: false,
        }
    }

    /// Sets whether to replace an existing database.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to write the configuration template.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What initialization did, or would do in dry-run mode.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether the configuration template was written.
    pub config_created: bool,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

/// Commented configuration template listing every option with its default.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r"# depot configuration
#
# Project files (depot.yaml, depot.local.yaml) and DEPOT_* environment
# variables override the values set here.

# Transport cost per storehouse group:
#   distance_factor * distance_km * sum(ln(max(weight, volume)) * count)
#   + handling_surcharge
# cost:
#   distance_factor: 1.0
#   handling_surcharge: 1000.0
#   metric_floor: 1.0        # used when max(weight, volume) <= 0

# Persist allocations that could not be fully satisfied, reporting
# every shortfall as a warning.
# allocation:
#   allow_partial: false

# Maximum lock wait time in seconds
# maximum_lock_wait_seconds: 5

# Refuse to create a missing data directory on first use
# disable_autoinit: false

# Output format for reserve, release and show: human or json
# output_format: human
";

/// Creates the data directory, the database and optionally the
/// configuration template.
///
/// An existing configuration file is never replaced.
///
/// # Errors
///
/// Returns an error if:
/// - the database exists and `overwrite` is false
/// - the data directory, database or configuration file cannot be created
///
/// # Examples
///
/// ```no_run
/// use depot::operations::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/depot-data"))
///     .with_create_config(true);
/// let result = init_database(&options).unwrap();
/// println!("Database created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    let config_path = options.data_dir.join(USER_CONFIG_FILE);
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    let result = InitResult {
        data_dir_created: !options.data_dir.exists(),
        database_created: true,
        config_created: options.create_config && !config_path.exists(),
        dry_run: options.dry_run,
        data_dir: options.data_dir.clone(),
    };

    if options.dry_run {
        return Ok(result);
    }

    if result.data_dir_created {
        fs::create_dir_all(&options.data_dir)?;
    }

    if db_exists {
        log::debug!("Removing existing database at {}", db_path.display());
        fs::remove_file(&db_path)?;
        for suffix in ["-wal", "-shm"] {
            let sidecar = options
                .data_dir
                .join(format!("{DATABASE_FILE_NAME}{suffix}"));
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
        }
    }

    Database::open(DatabaseConfig::new(&db_path))?;

    if result.config_created {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
    } else if options.create_config {
        log::warn!(
            "Configuration file {} already exists, leaving it unchanged",
            config_path.display()
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("depot");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert!(data_dir.join("depot.db").exists());
    }

    #[test]
    fn test_init_existing_directory() {
        let temp = TempDir::new().unwrap();

        let result = init_database(&InitOptions::new(temp.path().to_path_buf())).unwrap();

        assert!(!result.data_dir_created);
        assert!(result.database_created);
    }

    #[test]
    fn test_init_with_config_template_parses() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("depot");

        let options = InitOptions::new(data_dir.clone()).with_create_config(true);
        let result = init_database(&options).unwrap();

        assert!(result.config_created);
        let config = ConfigLoader::load_file(&data_dir.join("config.yaml")).unwrap();
        assert_eq!(config, crate::config::Config::default());
    }

    #[test]
    fn test_init_fails_without_overwrite() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("depot");
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        match init_database(&InitOptions::new(data_dir)) {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "database");
                assert!(message.contains("already exists"));
                assert!(message.contains("--overwrite"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_init_with_overwrite_resets_data() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("depot");
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        let db = Database::open(DatabaseConfig::new(data_dir.join("depot.db"))).unwrap();
        Database::upsert_item(db.connection(), &crate::fixtures::item(1)).unwrap();
        drop(db);

        let options = InitOptions::new(data_dir.clone()).with_overwrite(true);
        let result = init_database(&options).unwrap();
        assert!(result.database_created);

        let db = Database::open(DatabaseConfig::new(data_dir.join("depot.db"))).unwrap();
        assert!(Database::list_items(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn test_init_config_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("depot");
        fs::create_dir_all(&data_dir).unwrap();
        let config_path = data_dir.join("config.yaml");
        fs::write(&config_path, "disable_autoinit: true\n").unwrap();

        let options = InitOptions::new(data_dir).with_create_config(true);
        let result = init_database(&options).unwrap();

        assert!(!result.config_created);
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "disable_autoinit: true\n"
        );
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("depot");

        let options = InitOptions::new(data_dir.clone())
            .with_create_config(true)
            .with_dry_run(true);
        let result = init_database(&options).unwrap();

        assert!(result.dry_run);
        assert!(result.data_dir_created);
        assert!(result.config_created);
        assert!(!data_dir.exists());
    }
}
