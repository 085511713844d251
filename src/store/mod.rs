//! Path-addressed document store that pushes full snapshots to subscribers.
//!
//! The viewer only depends on the `RealtimeStore` trait, so the SQLite
//! implementation can be swapped for a hosted backend without touching the
//! catalog or counter code.

mod connection;
mod sqlite;
mod subscription;

use serde_json::Value;
use thiserror::Error;

pub use connection::{create_tables, ensure_schema, DB_FILE_NAME};
pub use sqlite::SqliteStore;
pub use subscription::{Snapshot, Subscription};

/// Path holding the song catalog.
pub const SONGS_PATH: &str = "songs";
/// Path holding the shared visit counter.
pub const VISITS_PATH: &str = "stats/visits";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value at {path} is not a counter")]
    NotACounter { path: String },
    #[error("counter at {path} cannot grow any further")]
    CounterOverflow { path: String },
    #[error("the root of the store must hold an object")]
    InvalidRoot,
}

pub trait RealtimeStore {
    /// Subscribe to `path`. The current value of the whole sub-tree is
    /// delivered immediately, then once per write at, above, or below `path`.
    fn subscribe(&self, path: &str) -> Subscription;

    /// Replace the value at `path`, creating missing parents. `null` removes it
    /// and prunes parents left empty.
    fn set(&self, path: &str, value: &Value) -> Result<(), StoreError>;

    /// Atomically add one to the integer at `path`, treating a missing value as
    /// zero. Returns the committed value.
    fn transactional_increment(&self, path: &str) -> Result<i64, StoreError>;
}

/// Strip surrounding slashes so `/songs/` and `songs` address the same node.
pub(crate) fn normalize_path(path: &str) -> String {
    path.trim().trim_matches('/').to_string()
}
