mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsondb_lib::consts::ROOT_ENV;
use jsondb_lib::paths::resolve_root;
use jsondb_lib::{Options, Store};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// jsondb - a tiny JSON document store
#[derive(Parser)]
#[command(name = "jsondb")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Database root directory
  #[arg(long, global = true, env = ROOT_ENV)]
  root: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short = 'o', long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write a record (JSON from the argument, or stdin when omitted)
  Write {
    collection: String,
    resource: String,
    /// Record contents as JSON
    value: Option<String>,
  },

  /// Print a record
  Read { collection: String, resource: String },

  /// Print every record in a collection
  ReadAll { collection: String },

  /// List the records of a collection, or all collections
  List { collection: Option<String> },

  /// Delete a record, or a whole collection when no resource is given
  Delete {
    collection: String,
    resource: Option<String>,
    /// Skip confirmation when deleting a collection
    #[arg(long)]
    force: bool,
  },

  /// Show the store location and contents summary
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let root = resolve_root(cli.root.as_deref());
  debug!(root = %root.display(), "resolved database root");

  let store = Store::open(&root, Options::default())
    .with_context(|| format!("Failed to open database at {}", root.display()))?;
  let output = cli.output;

  match cli.command {
    Commands::Write {
      collection,
      resource,
      value,
    } => cmd::cmd_write(&store, &collection, &resource, value, output),
    Commands::Read { collection, resource } => cmd::cmd_read(&store, &collection, &resource),
    Commands::ReadAll { collection } => cmd::cmd_read_all(&store, &collection, output),
    Commands::List { collection } => cmd::cmd_list(&store, collection.as_deref(), output),
    Commands::Delete {
      collection,
      resource,
      force,
    } => cmd::cmd_delete(&store, &collection, resource.as_deref(), force, output),
    Commands::Info => cmd::cmd_info(&store, output),
  }
}
