//! The record store.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! └── <collection>/          # one directory per collection
//!     ├── <resource>         # one file per record
//!     └── <resource>.tmp     # transient, only while a write is in flight
//! ```
//!
//! Writes and deletes take the collection's lock from the [`LockRegistry`]
//! for their whole duration. Reads take no lock: a record is only ever
//! published by an atomic rename, so a reader sees the old or the new
//! version of a record, never a torn one.

pub mod atomic;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::codec::{Codec, CodecError, JsonCodec};
use crate::consts::TMP_SUFFIX;
use crate::registry::{LockRegistry, lock_collection};

/// Sink for the store's human-readable messages.
pub type Logger = Arc<dyn Fn(&str) + Send + Sync>;

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("missing collection - no place to save record")]
  MissingCollection,

  #[error("missing resource - unable to save record")]
  MissingResource,

  #[error("invalid name {name:?}: names must not be '.' or '..', contain path separators or end in '.tmp'")]
  InvalidName { name: String },

  #[error("unable to find file or directory named {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to serialize record: {0}")]
  Serialize(#[source] CodecError),

  #[error("failed to deserialize record {}: {source}", path.display())]
  Deserialize {
    path: PathBuf,
    #[source]
    source: CodecError,
  },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("lock registry poisoned while locking collection {collection:?}")]
  LockPoisoned { collection: String },
}

impl StoreError {
  /// Whether the error means the collection or resource does not exist.
  ///
  /// `read_all` on a collection that was never written reports `NotFound`;
  /// callers usually treat that as an empty collection.
  pub fn is_not_found(&self) -> bool {
    matches!(self, StoreError::NotFound { .. })
  }
}

/// Map an I/O error on `path`, turning a missing file into `NotFound`.
fn io_error(path: &Path, source: io::Error) -> StoreError {
  if source.kind() == io::ErrorKind::NotFound {
    StoreError::NotFound {
      path: path.to_path_buf(),
    }
  } else {
    StoreError::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Options for [`Store::open`].
#[derive(Clone, Default)]
pub struct Options {
  /// Where open-time messages go. Defaults to `tracing::debug!`.
  pub logger: Option<Logger>,
}

impl Options {
  /// Options with a custom logging sink.
  pub fn with_logger(logger: impl Fn(&str) + Send + Sync + 'static) -> Self {
    Self {
      logger: Some(Arc::new(logger)),
    }
  }
}

impl fmt::Debug for Options {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Options")
      .field("logger", &self.logger.as_ref().map(|_| "<fn>"))
      .finish()
  }
}

fn default_logger() -> Logger {
  Arc::new(|message: &str| debug!("{}", message))
}

/// A directory of collections of records.
///
/// `Store` is `Send + Sync`; share one instance between threads with an `Arc`.
pub struct Store<C: Codec = JsonCodec> {
  root: PathBuf,
  registry: LockRegistry,
  codec: C,
  logger: Logger,
}

impl Store<JsonCodec> {
  /// Open the store at `root` using compact JSON records.
  ///
  /// An existing directory is reused. Otherwise it is created, along with
  /// its parents, with owner-only permissions.
  pub fn open(root: impl AsRef<Path>, options: Options) -> Result<Self, StoreError> {
    Self::open_with_codec(root, options, JsonCodec)
  }
}

impl<C: Codec> Store<C> {
  /// Open the store at `root`, encoding records with `codec`.
  pub fn open_with_codec(root: impl AsRef<Path>, options: Options, codec: C) -> Result<Self, StoreError> {
    let root = root.as_ref().to_path_buf();
    let logger = options.logger.unwrap_or_else(default_logger);

    if root.is_dir() {
      logger(&format!("Using '{}' (database already exists)", root.display()));
    } else if root.exists() {
      return Err(StoreError::CreateDir {
        path: root,
        source: io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
      });
    } else {
      logger(&format!("Creating database at '{}'...", root.display()));
      atomic::create_dir_all(&root).map_err(|source| StoreError::CreateDir {
        path: root.clone(),
        source,
      })?;
    }

    info!(root = %root.display(), "store opened");

    Ok(Self {
      root,
      registry: LockRegistry::new(),
      codec,
      logger,
    })
  }

  /// The store's root directory.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The registry holding this store's collection locks.
  pub fn registry(&self) -> &LockRegistry {
    &self.registry
  }

  /// The codec records are encoded with.
  pub fn codec(&self) -> &C {
    &self.codec
  }

  fn collection_path(&self, collection: &str) -> PathBuf {
    self.root.join(collection)
  }

  fn resource_path(&self, collection: &str, resource: &str) -> PathBuf {
    self.root.join(collection).join(resource)
  }

  /// Run `f` while holding the lock for `collection`.
  fn with_collection_lock<R>(
    &self,
    collection: &str,
    f: impl FnOnce() -> Result<R, StoreError>,
  ) -> Result<R, StoreError> {
    let lock = self.registry.acquire(collection)?;
    let _guard = lock_collection(&lock, collection);
    f()
  }

  /// Encode `value` and store it as `collection/resource`.
  ///
  /// The collection directory is created on first write. The record replaces
  /// any previous version in a single rename.
  pub fn write<T: Serialize + ?Sized>(&self, collection: &str, resource: &str, value: &T) -> Result<(), StoreError> {
    validate_collection(collection)?;
    validate_resource(resource)?;

    self.with_collection_lock(collection, || {
      let dir = self.ensure_collection(collection)?;
      let bytes = self.codec.encode(value).map_err(StoreError::Serialize)?;
      publish(&dir.join(resource), &bytes)
    })
  }

  /// Store already-encoded bytes as `collection/resource`.
  ///
  /// The bytes are not checked against the codec.
  pub fn write_bytes(&self, collection: &str, resource: &str, bytes: &[u8]) -> Result<(), StoreError> {
    validate_collection(collection)?;
    validate_resource(resource)?;

    self.with_collection_lock(collection, || {
      let dir = self.ensure_collection(collection)?;
      publish(&dir.join(resource), bytes)
    })
  }

  fn ensure_collection(&self, collection: &str) -> Result<PathBuf, StoreError> {
    let dir = self.collection_path(collection);
    atomic::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
      path: dir.clone(),
      source,
    })?;
    Ok(dir)
  }

  /// Read and decode `collection/resource`.
  pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> Result<T, StoreError> {
    let path = self.checked_resource_path(collection, resource)?;
    let bytes = read_record(&path)?;
    self
      .codec
      .decode(&bytes)
      .map_err(|source| StoreError::Deserialize { path, source })
  }

  /// Read the raw bytes of `collection/resource`.
  pub fn read_bytes(&self, collection: &str, resource: &str) -> Result<Vec<u8>, StoreError> {
    let path = self.checked_resource_path(collection, resource)?;
    read_record(&path)
  }

  fn checked_resource_path(&self, collection: &str, resource: &str) -> Result<PathBuf, StoreError> {
    validate_collection(collection)?;
    validate_resource(resource)?;
    Ok(self.resource_path(collection, resource))
  }

  /// Read the raw bytes of every record in `collection`.
  ///
  /// Records come back in directory listing order, which is not stable
  /// across filesystems. A collection that was never written fails with
  /// `NotFound`. If any record cannot be read the whole call fails.
  pub fn read_all(&self, collection: &str) -> Result<Vec<Vec<u8>>, StoreError> {
    validate_collection(collection)?;
    let dir = self.collection_path(collection);

    let mut records = Vec::new();
    for path in record_paths(&dir)? {
      records.push(read_record(&path)?);
    }

    debug!(collection, count = records.len(), "read collection");
    Ok(records)
  }

  /// Read and decode every record in `collection`.
  ///
  /// Only useful when all records of the collection share one type.
  pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
    validate_collection(collection)?;
    let dir = self.collection_path(collection);

    record_paths(&dir)?
      .into_iter()
      .map(|path| {
        let bytes = read_record(&path)?;
        self
          .codec
          .decode(&bytes)
          .map_err(|source| StoreError::Deserialize { path, source })
      })
      .collect()
  }

  /// Whether `collection/resource` exists as a record.
  pub fn exists(&self, collection: &str, resource: &str) -> Result<bool, StoreError> {
    let path = self.checked_resource_path(collection, resource)?;
    match fs::metadata(&path) {
      Ok(metadata) => Ok(metadata.is_file()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(source) => Err(StoreError::Io { path, source }),
    }
  }

  /// Names of the records in `collection`, sorted.
  pub fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
    validate_collection(collection)?;
    let dir = self.collection_path(collection);

    let mut names: Vec<String> = record_paths(&dir)?
      .into_iter()
      .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
      .collect();
    names.sort();
    Ok(names)
  }

  /// Names of all collections under the root, sorted.
  pub fn collections(&self) -> Result<Vec<String>, StoreError> {
    let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e))?;

    let mut names = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|e| io_error(&self.root, e))?;
      let is_dir = entry.file_type().map_err(|e| io_error(&entry.path(), e))?.is_dir();
      if !is_dir {
        continue;
      }
      if let Some(name) = entry.file_name().to_str() {
        names.push(name.to_string());
      }
    }
    names.sort();
    Ok(names)
  }

  /// Delete a record, or a whole collection when `resource` is empty.
  ///
  /// Serialized with writes to the same collection. Fails with `NotFound`
  /// if the target does not exist or is neither a file nor a directory.
  pub fn delete(&self, collection: &str, resource: &str) -> Result<(), StoreError> {
    validate_collection(collection)?;
    let path = if resource.is_empty() {
      self.collection_path(collection)
    } else {
      validate_resource(resource)?;
      self.resource_path(collection, resource)
    };

    self.with_collection_lock(collection, || {
      let metadata = fs::metadata(&path).map_err(|e| io_error(&path, e))?;

      let removed = if metadata.is_dir() {
        fs::remove_dir_all(&path)
      } else if metadata.is_file() {
        fs::remove_file(&path)
      } else {
        return Err(StoreError::NotFound { path });
      };
      removed.map_err(|e| io_error(&path, e))?;

      debug!(collection, resource, path = %path.display(), "deleted");
      if resource.is_empty() {
        (self.logger)(&format!("Deleted collection '{}'", collection));
      }
      Ok(())
    })
  }

  /// Delete `collection` and every record in it.
  pub fn delete_collection(&self, collection: &str) -> Result<(), StoreError> {
    self.delete(collection, "")
  }
}

impl<C: Codec + fmt::Debug> fmt::Debug for Store<C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Store")
      .field("root", &self.root)
      .field("registry", &self.registry)
      .field("codec", &self.codec)
      .finish_non_exhaustive()
  }
}

fn publish(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
  atomic::atomic_write(path, bytes).map_err(|source| StoreError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  debug!(path = %path.display(), bytes = bytes.len(), "record written");
  Ok(())
}

fn read_record(path: &Path) -> Result<Vec<u8>, StoreError> {
  let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
  debug!(path = %path.display(), bytes = bytes.len(), "record read");
  Ok(bytes)
}

/// Paths of the published records in `dir`, in listing order.
///
/// In-flight temp files and anything that is not a regular file are skipped.
fn record_paths(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
  let entries = fs::read_dir(dir).map_err(|e| io_error(dir, e))?;

  let mut paths = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| io_error(dir, e))?;
    let path = entry.path();
    let file_type = entry.file_type().map_err(|e| io_error(&path, e))?;
    if !file_type.is_file() || entry.file_name().to_string_lossy().ends_with(TMP_SUFFIX) {
      continue;
    }
    paths.push(path);
  }
  Ok(paths)
}

fn validate_name(name: &str) -> Result<(), StoreError> {
  if name == "." || name == ".." || name.contains(['/', '\\']) {
    return Err(StoreError::InvalidName { name: name.to_string() });
  }
  Ok(())
}

fn validate_collection(collection: &str) -> Result<(), StoreError> {
  if collection.is_empty() {
    return Err(StoreError::MissingCollection);
  }
  validate_name(collection)
}

fn validate_resource(resource: &str) -> Result<(), StoreError> {
  if resource.is_empty() {
    return Err(StoreError::MissingResource);
  }
  validate_name(resource)?;
  if resource.ends_with(TMP_SUFFIX) {
    return Err(StoreError::InvalidName {
      name: resource.to_string(),
    });
  }
  Ok(())
}
