use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn test_delete_record() {
  let env = TestEnv::new();
  env.write("fish", "onefish", "{}");

  env
    .jsondb_cmd()
    .args(["delete", "fish", "onefish"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Deleted fish/onefish"));

  assert!(!env.record_path("fish", "onefish").exists());
  env.jsondb_cmd().args(["read", "fish", "onefish"]).assert().failure();
}

#[test]
fn test_delete_missing_record_fails() {
  let env = TestEnv::new();
  env.write("fish", "onefish", "{}");

  env
    .jsondb_cmd()
    .args(["delete", "fish", "redfish"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unable to find"));
}

#[test]
fn test_delete_collection_requires_force_when_not_interactive() {
  let env = TestEnv::new();
  env.write("fish", "onefish", "{}");

  env
    .jsondb_cmd()
    .args(["delete", "fish"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--force"));

  assert!(env.record_path("fish", "onefish").exists());
}

#[test]
fn test_delete_collection_with_force() {
  let env = TestEnv::new();
  env.write("fish", "onefish", "{}");
  env.write("fish", "twofish", "{}");

  env
    .jsondb_cmd()
    .args(["delete", "fish", "--force"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Dropping 2 records from 'fish'"));

  assert!(!env.root_path().join("fish").exists());
}

#[test]
fn test_delete_missing_collection_fails() {
  let env = TestEnv::new();

  env
    .jsondb_cmd()
    .args(["delete", "never", "--force"])
    .assert()
    .failure();
}
