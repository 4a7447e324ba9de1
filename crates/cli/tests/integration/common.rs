//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the database root.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Database root (isolated per test).
  pub fn root_path(&self) -> PathBuf {
    self.temp.path().join("db")
  }

  /// Path of a record file inside the root.
  pub fn record_path(&self, collection: &str, resource: &str) -> PathBuf {
    self.root_path().join(collection).join(resource)
  }

  /// Get a pre-configured Command for the jsondb binary.
  ///
  /// Sets `JSONDB_ROOT` to the isolated root and clears `RUST_LOG`.
  pub fn jsondb_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("jsondb");
    cmd.env("JSONDB_ROOT", self.root_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// Write a record through the CLI, asserting success.
  pub fn write(&self, collection: &str, resource: &str, json: &str) {
    let output = self
      .jsondb_cmd()
      .args(["write", collection, resource, json])
      .output()
      .unwrap();
    assert!(
      output.status.success(),
      "write failed: {}",
      String::from_utf8_lossy(&output.stderr)
    );
  }

  /// Run a command and return its stdout, asserting success.
  pub fn stdout(&self, args: &[&str]) -> String {
    let output = self.jsondb_cmd().args(args).output().unwrap();
    assert!(
      output.status.success(),
      "{:?} failed: {}",
      args,
      String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
  }
}
