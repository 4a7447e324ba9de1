//! Atomic file publication.
//!
//! A record becomes visible only through a rename of a fully written and
//! synced temp file that lives next to the destination. Readers therefore see
//! either the previous contents or the new contents, never a partial file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::consts::TMP_SUFFIX;

/// Temp path used while `path` is being written (`<path>.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(TMP_SUFFIX);
  PathBuf::from(name)
}

/// Create `path` and any missing parents with owner-only permissions.
///
/// Succeeds if the directory already exists.
pub fn create_dir_all(path: &Path) -> io::Result<()> {
  let mut builder = fs::DirBuilder::new();
  builder.recursive(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(crate::consts::DIR_MODE);
  }
  builder.create(path)
}

/// Atomically replace `path` with `contents`.
///
/// The parent directory must exist. On failure the previous file (if any) is
/// untouched and the temp file is removed best effort.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
  let tmp = tmp_path(path);

  if let Err(e) = write_then_rename(&tmp, path, contents) {
    match fs::remove_file(&tmp) {
      Ok(()) => debug!(path = %tmp.display(), "removed temp file after failed write"),
      Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
      Err(cleanup) => warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp file"),
    }
    return Err(e);
  }

  sync_parent(path);
  Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
  let mut file = open_tmp(tmp)?;
  file.write_all(contents)?;
  file.sync_all()?;
  drop(file);

  fs::rename(tmp, path)
}

fn open_tmp(tmp: &Path) -> io::Result<File> {
  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(crate::consts::FILE_MODE);
  }
  options.open(tmp)
}

// The rename is already visible at this point; syncing the directory only
// makes it survive a crash, so a failure here is logged, not returned.
#[cfg(unix)]
fn sync_parent(path: &Path) {
  let Some(parent) = path.parent() else {
    return;
  };
  if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
    debug!(path = %parent.display(), error = %e, "failed to sync directory");
  }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) {}
