//! Implementation of the `jsondb list` command.

use anyhow::{Context, Result};
use jsondb_lib::Store;

use crate::output::{OutputFormat, print_info, print_json};

/// List the records of `collection`, or every collection when none is given.
pub fn cmd_list(store: &Store, collection: Option<&str>, output: OutputFormat) -> Result<()> {
  let (names, what) = match collection {
    Some(collection) => {
      let names = match store.list(collection) {
        Ok(names) => names,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e).with_context(|| format!("Failed to list collection {}", collection)),
      };
      (names, "records")
    }
    None => (store.collections().context("Failed to list collections")?, "collections"),
  };

  if output.is_json() {
    return print_json(&names);
  }

  if names.is_empty() {
    print_info(&format!("No {} found", what));
    return Ok(());
  }

  for name in &names {
    println!("{}", name);
  }
  print_info(&format!("{} {} total", names.len(), what));

  Ok(())
}
