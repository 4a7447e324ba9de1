//! Implementation of the `jsondb info` command.

use anyhow::{Context, Result};
use jsondb_lib::Store;
use serde::Serialize;

use crate::output::{OutputFormat, format_bytes, print_json, print_stat, print_success};

#[derive(Debug, Serialize)]
struct CollectionInfo {
  name: String,
  records: usize,
  bytes: u64,
}

#[derive(Debug, Serialize)]
struct StoreInfo {
  root: String,
  collections: Vec<CollectionInfo>,
}

/// Summarize the store: root path, collections, record counts and sizes.
pub fn cmd_info(store: &Store, output: OutputFormat) -> Result<()> {
  let mut collections = Vec::new();
  for name in store.collections().context("Failed to list collections")? {
    let records = store
      .read_all(&name)
      .with_context(|| format!("Failed to read collection {}", name))?;
    collections.push(CollectionInfo {
      records: records.len(),
      bytes: records.iter().map(|r| r.len() as u64).sum(),
      name,
    });
  }

  let info = StoreInfo {
    root: store.root().display().to_string(),
    collections,
  };

  if output.is_json() {
    return print_json(&info);
  }

  print_success(&format!("jsondb v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Root", &info.root);
  print_stat("Collections", &info.collections.len().to_string());
  for collection in &info.collections {
    print_stat(
      &format!("  {}", collection.name),
      &format!("{} record(s), {}", collection.records, format_bytes(collection.bytes)),
    );
  }

  Ok(())
}
