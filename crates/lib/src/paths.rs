//! Database root resolution.
//!
//! The root is picked in this order:
//! 1. an explicit path (e.g. the CLI's `--root`)
//! 2. the `JSONDB_ROOT` environment variable
//! 3. the platform data directory (`$XDG_DATA_HOME/jsondb`, `~/.local/share/jsondb`,
//!    `%APPDATA%\jsondb`)

use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, ROOT_ENV};

fn non_empty_var(name: &str) -> Option<PathBuf> {
  std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory, if known.
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  non_empty_var("USERPROFILE")
}

/// Returns the user's home directory, if known.
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  non_empty_var("HOME")
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> Option<PathBuf> {
  non_empty_var("APPDATA").map(|p| p.join(APP_NAME))
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> Option<PathBuf> {
  non_empty_var("XDG_DATA_HOME")
    .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
    .map(|p| p.join(APP_NAME))
}

/// Returns the default database root.
///
/// Falls back to `./.jsondb` when neither the override nor a data directory
/// can be determined.
pub fn default_root() -> PathBuf {
  non_empty_var(ROOT_ENV)
    .or_else(data_dir)
    .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)))
}

/// Resolve the database root, preferring an explicit path.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
  match explicit {
    Some(path) => path.to_path_buf(),
    None => default_root(),
  }
}
