//! Common test utilities for CLI integration tests.
//!
//! Each `TestEnv` owns a temporary directory holding the data directory.
//! Commands run from inside it with every `DEPOT_*` variable cleared, so
//! neither the caller's environment nor stray project files leak in.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DEPOT_VARIABLES: [&str; 10] = [
    "DEPOT_DATA_DIR",
    "DEPOT_BUSY_TIMEOUT",
    "DEPOT_DISABLE_AUTOINIT",
    "DEPOT_LOG_MODE",
    "DEPOT_DISTANCE_FACTOR",
    "DEPOT_HANDLING_SURCHARGE",
    "DEPOT_METRIC_FLOOR",
    "DEPOT_ALLOW_PARTIAL",
    "DEPOT_MAXIMUM_LOCK_WAIT_SECONDS",
    "DEPOT_OUTPUT_FORMAT",
];

/// Test environment with an isolated data directory.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the depot data directory (created on first use)
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("depot-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// A command with a clean environment and no `--data-dir`.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("depot").expect("Failed to find depot binary");
        for var in DEPOT_VARIABLES {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.temp_path);
        cmd
    }

    /// A command pointed at this environment's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Stores the standard catalog and storehouses:
    /// `north` (10 crates, 2 barrels) at latitude 60, `middle` (4 crates)
    /// at 55 and `south` (6 crates) at 50, all on longitude 10.
    pub fn seed(&self) {
        self.run(&[
            "item", "add", "--id", "crate", "--name", "Crate", "--length", "1", "--width", "1",
            "--height", "1", "--weight", "20",
        ]);
        self.run(&[
            "item", "add", "--id", "barrel", "--length", "0.6", "--width", "0.6", "--height",
            "1", "--weight", "80",
        ]);
        for (id, latitude) in [("north", "60"), ("middle", "55"), ("south", "50")] {
            self.run(&[
                "storehouse",
                "add",
                "--id",
                id,
                "--latitude",
                latitude,
                "--longitude",
                "10",
            ]);
        }
        for (storehouse, item, count) in [
            ("north", "crate", "10"),
            ("north", "barrel", "2"),
            ("middle", "crate", "4"),
            ("south", "crate", "6"),
        ] {
            self.run(&[
                "stock",
                "set",
                "--storehouse",
                storehouse,
                "--item",
                item,
                "--count",
                count,
            ]);
        }
    }

    /// Runs a command that must succeed and returns its stdout.
    pub fn run(&self, args: &[&str]) -> String {
        let output = self.command().args(args).output().expect("Failed to run depot");
        assert!(
            output.status.success(),
            "depot {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Runs a command with `--format json` and parses its stdout.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.extend(["--format", "json"]);
        serde_json::from_str(&self.run(&args)).expect("Output is not valid JSON")
    }

    /// Reserves from latitude 58 and returns the reservation id.
    pub fn reserve(&self, entries: &[&str]) -> String {
        let mut args = vec!["reserve", "--latitude", "58", "--longitude", "10"];
        for entry in entries {
            args.extend(["--entry", entry]);
        }
        let doc = self.run_json(&args);
        doc["id"].as_str().expect("Reservation id missing").to_string()
    }

    /// Unreserved count of one item in one storehouse.
    pub fn unreserved(&self, storehouse: &str, item: &str) -> u64 {
        let doc = self.run_json(&["unreserved", "--storehouse", storehouse, "--item", item]);
        doc.as_array()
            .and_then(|rows| rows.first())
            .and_then(|row| row["count"].as_u64())
            .unwrap_or(0)
    }
}
