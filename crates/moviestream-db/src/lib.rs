//! Local persistence for moviestream.
//!
//! Uses `rusqlite` (bundled `SQLite`) for a small key-value table that
//! holds the registered user and the logged-in flag.

mod connection;
/// String key-value storage.
pub mod kv;
mod migrations;
/// Typed session records.
pub mod session;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, open_in_memory, resolve_data_dir};
pub use kv::{KeyValueStore, SqliteKvStore};
pub use session::{LOGGED_IN_KEY, SessionStore, USER_DATA_KEY, UserRecord};
