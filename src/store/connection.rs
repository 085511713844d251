use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "hymnal.sqlite";

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection. Both the document store and the asset cache call this, so every
/// statement must stay idempotent.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    create_tables(&conn)?;
    Ok(conn)
}

/// Create the document and cache tables on an already open connection.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS nodes (
            path TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create nodes table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS asset_cache (
            cache_name TEXT NOT NULL,
            url TEXT NOT NULL,
            status INTEGER NOT NULL,
            content_type TEXT,
            body BLOB NOT NULL,
            PRIMARY KEY (cache_name, url)
        )",
        [],
    )
    .context("failed to create asset_cache table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DB_FILE_NAME);
        ensure_schema(&path).unwrap();
        let conn = ensure_schema(&path).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('nodes', 'asset_cache')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}
