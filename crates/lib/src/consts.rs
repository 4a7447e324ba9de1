//! Crate-wide constants.

/// Application name, used for default data directories.
pub const APP_NAME: &str = "jsondb";

/// Environment variable overriding the database root.
pub const ROOT_ENV: &str = "JSONDB_ROOT";

/// Permission mode for the root and collection directories (owner rwx).
pub const DIR_MODE: u32 = 0o700;

/// Permission mode for record files (owner rw).
pub const FILE_MODE: u32 = 0o600;

/// Suffix appended to a record path while it is being written.
pub const TMP_SUFFIX: &str = ".tmp";
