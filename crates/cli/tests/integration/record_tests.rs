use predicates::prelude::*;
use serde_json::{Value, json};

use super::common::TestEnv;

#[test]
fn test_write_then_read() {
  let env = TestEnv::new();
  env.write("fish", "onefish", r#"{"name":"onefish","fins":2}"#);

  let stdout = env.stdout(&["read", "fish", "onefish"]);
  let value: Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(value, json!({ "name": "onefish", "fins": 2 }));
}

#[test]
fn test_write_creates_record_file() {
  let env = TestEnv::new();
  env.write("fish", "onefish", r#"{"name":"onefish"}"#);

  let raw = std::fs::read_to_string(env.record_path("fish", "onefish")).unwrap();
  assert_eq!(raw, r#"{"name":"onefish"}"#);
  assert!(!env.record_path("fish", "onefish.tmp").exists());
}

#[test]
fn test_write_from_stdin() {
  let env = TestEnv::new();

  env
    .jsondb_cmd()
    .args(["write", "fish", "redfish"])
    .write_stdin(r#"{"color": "red"}"#)
    .assert()
    .success();

  let stdout = env.stdout(&["read", "fish", "redfish"]);
  let value: Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(value, json!({ "color": "red" }));
}

#[test]
fn test_write_rejects_invalid_json() {
  let env = TestEnv::new();

  env
    .jsondb_cmd()
    .args(["write", "fish", "onefish", "not json {{{"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not valid JSON"));

  assert!(!env.record_path("fish", "onefish").exists());
}

#[test]
fn test_write_missing_collection() {
  let env = TestEnv::new();

  env
    .jsondb_cmd()
    .args(["write", "", "onefish", "{}"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing collection"));
}

#[test]
fn test_write_missing_resource() {
  let env = TestEnv::new();

  env
    .jsondb_cmd()
    .args(["write", "fish", "", "{}"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing resource"));
}

#[test]
fn test_write_rejects_path_traversal() {
  let env = TestEnv::new();

  env
    .jsondb_cmd()
    .args(["write", "..", "escape", "{}"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid name"));
}

#[test]
fn test_write_json_output() {
  let env = TestEnv::new();

  let output = env
    .jsondb_cmd()
    .args(["write", "fish", "onefish", "{}", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let value: Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["collection"], "fish");
  assert_eq!(value["resource"], "onefish");
  assert_eq!(value["written"], true);
}

#[test]
fn test_overwrite_replaces_record() {
  let env = TestEnv::new();
  env.write("fish", "onefish", r#"{"version": 1}"#);
  env.write("fish", "onefish", r#"{"version": 2}"#);

  let stdout = env.stdout(&["read", "fish", "onefish"]);
  let value: Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(value["version"], 2);
}

#[test]
fn test_read_all_text() {
  let env = TestEnv::new();
  env.write("points", "a", r#"{"x":1}"#);
  env.write("points", "b", r#"{"x":2}"#);

  let stdout = env.stdout(&["read-all", "points"]);
  let mut xs: Vec<i64> = stdout
    .lines()
    .map(|line| serde_json::from_str::<Value>(line).unwrap()["x"].as_i64().unwrap())
    .collect();
  xs.sort();
  assert_eq!(xs, vec![1, 2]);
}

#[test]
fn test_read_all_json() {
  let env = TestEnv::new();
  env.write("points", "a", r#"{"x":1}"#);
  env.write("points", "b", r#"{"x":2}"#);

  let stdout = env.stdout(&["read-all", "points", "-o", "json"]);
  let values: Vec<Value> = serde_json::from_str(&stdout).unwrap();
  assert_eq!(values.len(), 2);
  assert!(values.contains(&json!({ "x": 1 })));
  assert!(values.contains(&json!({ "x": 2 })));
}

#[test]
fn test_read_all_missing_collection_json_is_empty_array() {
  let env = TestEnv::new();

  let stdout = env.stdout(&["read-all", "never", "-o", "json"]);
  let values: Vec<Value> = serde_json::from_str(&stdout).unwrap();
  assert!(values.is_empty());
}

#[test]
fn test_read_all_fails_on_malformed_record() {
  let env = TestEnv::new();
  env.write("points", "a", r#"{"x":1}"#);
  std::fs::write(env.record_path("points", "broken"), "not json {{{").unwrap();

  env
    .jsondb_cmd()
    .args(["read-all", "points"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("{\"x\":1}").not())
    .stderr(predicate::str::contains("Failed to read collection points"));
}

#[test]
fn test_list_collections_and_records() {
  let env = TestEnv::new();
  env.write("fish", "twofish", "{}");
  env.write("fish", "onefish", "{}");
  env.write("birds", "robin", "{}");

  let collections = env.stdout(&["list", "-o", "json"]);
  let collections: Vec<String> = serde_json::from_str(&collections).unwrap();
  assert_eq!(collections, vec!["birds", "fish"]);

  let records = env.stdout(&["list", "fish", "-o", "json"]);
  let records: Vec<String> = serde_json::from_str(&records).unwrap();
  assert_eq!(records, vec!["onefish", "twofish"]);
}

#[test]
fn test_info_json_counts_records() {
  let env = TestEnv::new();
  env.write("fish", "onefish", "{}");
  env.write("fish", "twofish", "{}");

  let stdout = env.stdout(&["info", "-o", "json"]);
  let info: Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(info["collections"][0]["name"], "fish");
  assert_eq!(info["collections"][0]["records"], 2);
  assert_eq!(info["collections"][0]["bytes"], 4);
}
