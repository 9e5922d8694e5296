//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builders with a clean strata environment
//! - Fragment and configuration fixtures

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables the CLI reads; cleared so the host environment cannot leak in.
const STRATA_VARS: [&str; 5] = [
    "STRATA_LAYER_CONFIG",
    "STRATA_CHANNEL_CONFIG",
    "STRATA_CONFIGS_DIR",
    "STRATA_LOG_MODE",
    "STRATA_VALIDATOR",
];

/// Test environment with an isolated configs directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the bundled configs directory
    pub configs_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with an empty configs directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let configs_dir = temp_path.join("configs");
        fs::create_dir_all(&configs_dir).expect("Failed to create configs dir");

        Self {
            temp_dir,
            temp_path,
            configs_dir,
        }
    }

    /// Command with only the strata variables cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("strata").expect("Failed to find strata binary");
        for var in STRATA_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.temp_path);
        cmd
    }

    /// Command with `--configs-dir` pointing at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--configs-dir").arg(&self.configs_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Create a fragment directory holding the given files.
    pub fn fragment_dir(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.temp_path.join(name);
        fs::create_dir_all(&dir).expect("Failed to create fragment directory");
        for (file, contents) in files {
            fs::write(dir.join(file), contents).expect("Failed to write fragment");
        }
        dir
    }

    /// Write a file under the temp directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Write both bundled defaults with valid contents.
    pub fn write_defaults(&self) {
        fs::write(self.configs_dir.join("layers.yaml"), VALID_LAYERS)
            .expect("Failed to write layers default");
        fs::write(self.configs_dir.join("channels.yaml"), VALID_CHANNELS)
            .expect("Failed to write channels default");
    }
}

/// A valid collapsed layers file.
pub const VALID_LAYERS: &str = "beauty:\n    - diffuse\n    - spec\n";

/// A valid collapsed channels file.
pub const VALID_CHANNELS: &str = "rgba:\n    - red\n    - green\n    - blue\n    - alpha\n";

/// Path of the strata binary, for using it as an external validator.
#[allow(dead_code)]
pub fn strata_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("strata")
}
