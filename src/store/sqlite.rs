//! SQLite-backed document store. The data forms one JSON tree addressed by
//! slash-separated paths; each top-level child is kept in its own row. Writes
//! push a fresh snapshot to every subscriber whose path lies on the written
//! path, above it or below it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc;

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::subscription::{Registry, Snapshot, Subscriber, Subscription};
use super::{normalize_path, RealtimeStore, StoreError};

pub struct SqliteStore {
    conn: Connection,
    subscribers: Registry,
    next_id: Cell<u64>,
}

impl SqliteStore {
    /// Wrap a connection whose schema was prepared by `ensure_schema`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Read the current value at `path`.
    pub fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        read_path(&self.conn, &normalize_path(path))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver fresh snapshots to every subscriber affected by a write to
    /// `written`.
    fn notify(&self, written: &str) {
        let subscribers = self.subscribers.borrow();
        for subscriber in subscribers
            .iter()
            .filter(|s| paths_overlap(&s.path, written))
        {
            let snapshot: Snapshot = read_path(&self.conn, &subscriber.path);
            if subscriber.sender.send(snapshot).is_err() {
                debug!(path = %subscriber.path, id = subscriber.id, "subscriber receiver dropped");
            }
        }
    }
}

impl RealtimeStore for SqliteStore {
    fn subscribe(&self, path: &str) -> Subscription {
        let path = normalize_path(path);
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let (sender, receiver) = mpsc::channel();
        let initial = read_path(&self.conn, &path);
        if let Err(err) = &initial {
            warn!(path = %path, error = %err, "initial snapshot failed");
        }
        // The receiver is still alive, so the send cannot fail.
        let _ = sender.send(initial);

        self.subscribers.borrow_mut().push(Subscriber {
            id,
            path: path.clone(),
            sender,
        });
        Subscription::new(id, path, receiver, &self.subscribers)
    }

    fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        let path = normalize_path(path);
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        write_path(&tx, &path, value.clone())?;
        tx.commit()?;

        self.notify(&path);
        Ok(())
    }

    fn transactional_increment(&self, path: &str) -> Result<i64, StoreError> {
        let path = normalize_path(path);
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let current = match read_path(&tx, &path)? {
            None => 0,
            Some(value) => counter_value(&value).ok_or_else(|| StoreError::NotACounter {
                path: path.clone(),
            })?,
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::CounterOverflow { path: path.clone() })?;

        write_path(&tx, &path, Value::from(next))?;
        tx.commit()?;

        self.notify(&path);
        Ok(next)
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// True when one path is an ancestor of the other, or both are the same.
fn paths_overlap(a: &str, b: &str) -> bool {
    segments(a)
        .iter()
        .zip(segments(b).iter())
        .all(|(x, y)| x == y)
}

/// JSON pointer for the segments below a top-level node.
fn json_pointer(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| format!("/{}", segment.replace('~', "~0")))
        .collect()
}

/// Integral counter value. Whole floats such as `3.0` count as integers.
fn counter_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64)
            .map(|n| n as i64)
    })
}

fn read_path(conn: &Connection, path: &str) -> Result<Option<Value>, StoreError> {
    let segments = segments(path);
    let Some((top, rest)) = segments.split_first() else {
        return read_root(conn);
    };
    let node = match read_row(conn, top)? {
        Some(node) => node,
        None => return Ok(None),
    };
    Ok(node
        .pointer(&json_pointer(rest))
        .filter(|value| !value.is_null())
        .cloned())
}

fn read_root(conn: &Connection) -> Result<Option<Value>, StoreError> {
    let mut stmt = conn.prepare("SELECT path, value FROM nodes ORDER BY path")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut root = Map::new();
    for row in rows {
        let (key, text) = row?;
        root.insert(key, serde_json::from_str(&text)?);
    }
    Ok(if root.is_empty() {
        None
    } else {
        Some(Value::Object(root))
    })
}

fn read_row(conn: &Connection, key: &str) -> Result<Option<Value>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM nodes WHERE path = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

fn write_path(conn: &Connection, path: &str, value: Value) -> Result<(), StoreError> {
    let segments = segments(path);
    let Some((top, rest)) = segments.split_first() else {
        return write_root(conn, value);
    };

    let current = if rest.is_empty() {
        Value::Null
    } else {
        read_row(conn, top)?.unwrap_or(Value::Null)
    };
    write_row(conn, top, assign(current, rest, value))
}

fn write_root(conn: &Connection, value: Value) -> Result<(), StoreError> {
    let children = match value {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        _ => return Err(StoreError::InvalidRoot),
    };
    conn.execute("DELETE FROM nodes", [])?;
    for (key, child) in children {
        write_row(conn, &key, child)?;
    }
    Ok(())
}

fn write_row(conn: &Connection, key: &str, value: Value) -> Result<(), StoreError> {
    if value.is_null() {
        conn.execute("DELETE FROM nodes WHERE path = ?1", params![key])?;
    } else {
        conn.execute(
            "INSERT INTO nodes (path, value) VALUES (?1, ?2)
             ON CONFLICT(path) DO UPDATE SET value = excluded.value",
            params![key, serde_json::to_string(&value)?],
        )?;
    }
    Ok(())
}

/// Place `value` at `path` below `node`. Missing parents are created, arrays
/// along the way become objects keyed by index, and parents left empty by a
/// `null` write are pruned.
fn assign(node: Value, path: &[&str], value: Value) -> Value {
    let Some((head, rest)) = path.split_first() else {
        return value;
    };

    let mut children: Map<String, Value> = match node {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Map::new(),
    };

    let child = children.remove(*head).unwrap_or(Value::Null);
    let child = assign(child, rest, value);
    if !child.is_null() {
        children.insert(head.to_string(), child);
    }

    if children.is_empty() {
        Value::Null
    } else {
        Value::Object(children)
    }
}
