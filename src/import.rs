//! Load a realtime-database JSON export into the local store.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tracing::info;

use crate::store::{RealtimeStore, SONGS_PATH};

/// Top-level nodes of a whole-database export besides `songs`. Their presence
/// means the file is not a bare songs map.
const DATABASE_KEYS: &[&str] = &["stats"];

/// Pick the songs sub-tree out of an export. Accepts the whole database (with a
/// top-level `songs` key) or the bare songs object/array.
pub fn songs_from_export(export: Value) -> Result<Value> {
    match export {
        Value::Object(mut root) => match root.remove(SONGS_PATH) {
            Some(songs @ (Value::Object(_) | Value::Array(_))) => Ok(songs),
            Some(Value::Null) => Err(anyhow!("the export's `songs` node is empty")),
            Some(other) => Err(anyhow!(
                "expected `songs` to be an object or array, found {}",
                kind_name(&other)
            )),
            None if DATABASE_KEYS.iter().any(|key| root.contains_key(*key)) => {
                Err(anyhow!("the export has no `songs` node"))
            }
            None => Ok(Value::Object(root)),
        },
        songs @ Value::Array(_) => Ok(songs),
        other => Err(anyhow!(
            "expected a JSON object or array of songs, found {}",
            kind_name(&other)
        )),
    }
}

/// Replace the `songs` document with the contents of `path`. Returns the number
/// of records written.
pub fn import_file<S: RealtimeStore + ?Sized>(store: &S, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let export: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let songs = songs_from_export(export)?;

    let count = match &songs {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.iter().filter(|item| !item.is_null()).count(),
        _ => 0,
    };

    store
        .set(SONGS_PATH, &songs)
        .context("failed to store imported songs")?;
    info!(count, path = %path.display(), "imported songs");
    Ok(count)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
