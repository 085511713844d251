//! Project raw `songs` snapshots from the realtime store into a sorted,
//! deduplicated catalog.
//!
//! Records are loosely shaped JSON objects. Missing fields degrade to empty
//! strings; a record is never dropped for being malformed.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::Song;

/// Build the catalog from a snapshot of the `songs` path.
///
/// The snapshot may be an object keyed by storage key or an array (the store
/// returns arrays for dense integer keys). `null` array holes are skipped. When
/// two records resolve to the same id, the one seen last wins.
pub fn project(snapshot: Option<&Value>) -> Vec<Song> {
    let records: Vec<(String, &Value)> = match snapshot {
        Some(Value::Object(map)) => map.iter().map(|(key, value)| (key.clone(), value)).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => return Vec::new(),
    };

    let mut songs: Vec<Song> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (key, record) in records {
        let song = project_record(&key, record);
        match positions.get(&song.id) {
            Some(&index) => {
                debug!(id = %song.id, replaced = %songs[index].key, by = %song.key, "duplicate song id");
                songs[index] = song;
            }
            None => {
                positions.insert(song.id.clone(), songs.len());
                songs.push(song);
            }
        }
    }

    songs.sort_by(|a, b| compare_ids(&a.id, &b.id));
    songs
}

/// Normalize one raw record stored under `key`.
pub fn project_record(key: &str, record: &Value) -> Song {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    let id = fields
        .get("id")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| key.to_string());
    let title = text_field(fields, "title").unwrap_or_default();
    let display_title = text_field(fields, "dtitle")
        .or_else(|| text_field(fields, "title"))
        .or_else(|| text_field(fields, "nativeTitle"))
        .unwrap_or_default();
    let native_title = text_field(fields, "nativeTitle").unwrap_or_else(|| display_title.clone());
    let language = text_field(fields, "language")
        .map(|lang| lang.trim().to_string())
        .unwrap_or_default();
    let lyrics = fields
        .get("lyrics")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Song {
        key: key.to_string(),
        id,
        title,
        display_title,
        native_title,
        language,
        lyrics,
    }
}

/// Read a string field, treating blank strings as absent.
fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// Coerce an id field to a string. Integral numbers print without a fraction.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(match number.as_i64() {
            Some(int) => int.to_string(),
            None => number.to_string(),
        }),
        _ => None,
    }
}

/// Canonical catalog order: numeric when both ids are numbers, numbers before
/// other ids, lexicographic otherwise. Numeric ties fall back to the raw text
/// so the order stays total (`"7"` before `"07"` is not guaranteed otherwise).
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn parse_numeric(id: &str) -> Option<f64> {
    id.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
