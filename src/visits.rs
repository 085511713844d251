//! One-shot visit counting. Each install increments the shared counter at most
//! once; afterwards it only watches the value through a subscription.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::store::{RealtimeStore, VISITS_PATH};

/// Flag recording that this install already bumped the visit counter.
pub const VISIT_FLAG: &str = "visit_counted";

/// Persisted boolean flags, one marker file each. Flags never expire.
pub struct LocalFlags {
    dir: PathBuf,
}

impl LocalFlags {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flag_path(name).exists()
    }

    pub fn set(&self, name: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.flag_path(name), b"1")
    }

    fn flag_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.flag"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The counter was incremented to this value.
    Counted(i64),
    AlreadyCounted,
    /// The increment failed; the flag stays clear so a later run retries.
    Failed,
}

/// Increment `stats/visits` unless this install already did. Failures are
/// logged and otherwise ignored.
pub fn count_visit_once<S: RealtimeStore + ?Sized>(store: &S, flags: &LocalFlags) -> VisitOutcome {
    if flags.is_set(VISIT_FLAG) {
        return VisitOutcome::AlreadyCounted;
    }

    match store.transactional_increment(VISITS_PATH) {
        Ok(total) => {
            if let Err(err) = flags.set(VISIT_FLAG) {
                warn!(error = %err, "failed to persist visit flag");
            }
            info!(total, "visit counted");
            VisitOutcome::Counted(total)
        }
        Err(err) => {
            warn!(error = %err, "error updating visit counter");
            VisitOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use serde_json::json;

    use super::*;
    use crate::store::{create_tables, SqliteStore};

    fn store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[test]
    fn counts_only_once_per_install() {
        let dir = tempfile::tempdir().unwrap();
        let flags = LocalFlags::new(dir.path().join("flags"));
        let store = store();

        assert_eq!(count_visit_once(&store, &flags), VisitOutcome::Counted(1));
        assert!(flags.is_set(VISIT_FLAG));
        assert_eq!(count_visit_once(&store, &flags), VisitOutcome::AlreadyCounted);
        assert_eq!(store.get(VISITS_PATH).unwrap(), Some(json!(1)));
    }

    #[test]
    fn separate_installs_share_the_counter() {
        let store = store();
        store.set(VISITS_PATH, &json!(41)).unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        count_visit_once(&store, &LocalFlags::new(first.path()));
        let outcome = count_visit_once(&store, &LocalFlags::new(second.path()));
        assert_eq!(outcome, VisitOutcome::Counted(43));
    }

    #[test]
    fn failed_increment_leaves_flag_clear() {
        let dir = tempfile::tempdir().unwrap();
        let flags = LocalFlags::new(dir.path());
        let store = store();
        store.set(VISITS_PATH, &json!({ "broken": true })).unwrap();

        assert_eq!(count_visit_once(&store, &flags), VisitOutcome::Failed);
        assert!(!flags.is_set(VISIT_FLAG));
    }
}
