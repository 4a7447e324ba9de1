//! Interactive confirmation for destructive commands.

use anyhow::{Result, bail};
use std::io::{self, IsTerminal, Write};

/// Ask before dropping `collection` and its `records` records.
///
/// `force` skips the question. Without a terminal on both stdin and stderr
/// there is nobody to ask, so the drop is refused and `--force` suggested.
pub fn confirm_drop(collection: &str, records: usize, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!(
      "Refusing to drop collection '{}' without confirmation. Use --force to proceed.",
      collection
    );
  }

  write!(io::stderr(), "{} [y/N] ", drop_question(collection, records))?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().read_line(&mut input)?;

  Ok(is_yes(&input))
}

fn drop_question(collection: &str, records: usize) -> String {
  let noun = if records == 1 { "record" } else { "records" };
  format!("Drop collection '{}' and its {} {}?", collection, records, noun)
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
