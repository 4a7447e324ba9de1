//! Implementation of the `jsondb delete` command.

use anyhow::{Context, Result};
use jsondb_lib::Store;
use serde_json::json;

use crate::output::{OutputFormat, print_info, print_json, print_success, print_warning};
use crate::prompts::confirm_drop;

/// Delete one record, or a whole collection when `resource` is omitted.
///
/// Dropping a collection asks for confirmation unless `force` is set.
pub fn cmd_delete(
  store: &Store,
  collection: &str,
  resource: Option<&str>,
  force: bool,
  output: OutputFormat,
) -> Result<()> {
  let target = match resource {
    Some(resource) => format!("{}/{}", collection, resource),
    None => {
      let records = store.list(collection).map(|names| names.len()).unwrap_or(0);
      if !confirm_drop(collection, records, force)? {
        print_info("Aborted");
        return Ok(());
      }
      if force && records > 0 {
        print_warning(&format!("Dropping {} records from '{}'", records, collection));
      }
      collection.to_string()
    }
  };

  store
    .delete(collection, resource.unwrap_or_default())
    .with_context(|| format!("Failed to delete {}", target))?;

  if output.is_json() {
    print_json(&json!({ "deleted": target }))?;
  } else {
    print_success(&format!("Deleted {}", target));
  }

  Ok(())
}
