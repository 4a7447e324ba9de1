//! Implementation of the `jsondb read` command.

use anyhow::{Context, Result};
use jsondb_lib::Store;
use serde_json::Value;

use crate::output::print_json;

/// Print a single record as pretty JSON.
pub fn cmd_read(store: &Store, collection: &str, resource: &str) -> Result<()> {
  let record: Value = store
    .read(collection, resource)
    .with_context(|| format!("Failed to read {}/{}", collection, resource))?;

  print_json(&record)
}
