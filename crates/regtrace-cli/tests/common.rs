//! Common test utilities shared across integration tests.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory to run `regtrace` in
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_suite(&self, content: &str) -> PathBuf {
        let evals = self.root().join("evals");
        fs::create_dir_all(&evals).expect("Failed to create evals dir");
        let path = evals.join("tests.toml");
        fs::write(&path, content).expect("Failed to write suite");
        path
    }

    pub fn results_path(&self) -> PathBuf {
        self.root().join(".regtrace").join("results.json")
    }

    /// Run regtrace with this project as the working directory
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("regtrace").expect("Failed to find regtrace binary");
        cmd.current_dir(self.root());
        cmd
    }
}
