//! Implementation of the `jsondb write` command.

use std::io::{self, Read};

use anyhow::{Context, Result};
use jsondb_lib::Store;
use serde_json::{Value, json};
use tracing::debug;

use crate::output::{OutputFormat, print_json, print_success};

/// Parse `value` (or stdin when absent) as JSON and store it.
///
/// The input is parsed before anything touches the store, so malformed JSON
/// never reaches disk.
pub fn cmd_write(store: &Store, collection: &str, resource: &str, value: Option<String>, output: OutputFormat) -> Result<()> {
  let raw = match value {
    Some(value) => value,
    None => {
      let mut buf = String::new();
      io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read record from stdin")?;
      buf
    }
  };

  let record: Value = serde_json::from_str(&raw).context("Record is not valid JSON")?;
  debug!(collection, resource, "writing record");

  store
    .write(collection, resource, &record)
    .with_context(|| format!("Failed to write {}/{}", collection, resource))?;

  if output.is_json() {
    print_json(&json!({ "collection": collection, "resource": resource, "written": true }))?;
  } else {
    print_success(&format!("Wrote {}/{}", collection, resource));
  }

  Ok(())
}
