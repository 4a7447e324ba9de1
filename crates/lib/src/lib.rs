//! jsondb-lib: a tiny JSON document store.
//!
//! Records are stored one file per record, grouped into collections
//! (one directory per collection) under a single root:
//!
//! - `Store`: the entry point for writing, reading and deleting records
//! - `LockRegistry`: per-collection mutexes serializing writes and deletes
//! - `Codec`: how values are turned into bytes and back
//!
//! ```no_run
//! use jsondb_lib::{Options, Store};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), jsondb_lib::StoreError> {
//! let store = Store::open("/tmp/db", Options::default())?;
//! store.write("fish", "onefish", &json!({ "name": "onefish" }))?;
//! let fish: serde_json::Value = store.read("fish", "onefish")?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod consts;
pub mod paths;
pub mod registry;
pub mod store;

pub use codec::{Codec, JsonCodec, PrettyJsonCodec};
pub use registry::LockRegistry;
pub use store::{Logger, Options, Store, StoreError};
