//! Implementation of the `jsondb read-all` command.

use anyhow::{Context, Result};
use jsondb_lib::Store;
use serde_json::Value;

use crate::output::{OutputFormat, print_info, print_json};

/// Print every record of a collection.
///
/// Text output is one compact JSON document per line. A collection that does
/// not exist is reported as empty. A single unreadable or malformed record
/// fails the whole command.
pub fn cmd_read_all(store: &Store, collection: &str, output: OutputFormat) -> Result<()> {
  let records: Vec<Value> = match store.read_all_as(collection) {
    Ok(records) => records,
    Err(e) if e.is_not_found() => Vec::new(),
    Err(e) => return Err(e).with_context(|| format!("Failed to read collection {}", collection)),
  };

  if output.is_json() {
    return print_json(&records);
  }

  if records.is_empty() {
    print_info(&format!("No records in '{}'", collection));
    return Ok(());
  }

  for record in &records {
    println!("{}", record);
  }

  Ok(())
}
