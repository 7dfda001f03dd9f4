//! JSON document store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;

/// Field holding a record's identifier.
pub const ID_FIELD: &str = "id";

/// Exact-match filters on top-level record fields.
pub type Filter = HashMap<String, String>;

/// A flat JSON document of named collections.
///
/// The document is a single JSON object whose array-valued members are
/// collections of records (`{"news": [...], "surveys": [...]}`). All
/// reads share a lock; every mutation takes the write lock and is
/// written back to disk before the lock is released, so concurrent
/// writers never interleave on the file.
#[derive(Debug)]
pub struct JsonStore {
    path: Option<PathBuf>,
    data: RwLock<Map<String, Value>>,
}

impl JsonStore {
    /// Opens the store backed by `path`.
    ///
    /// A missing file yields an empty store; the file is created on the first write.
    ///
    /// # Errors
    ///
    /// - `StoreError::Json` if the file is not valid JSON
    /// - `StoreError::InvalidRecord` if the top level is not an object
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes)? {
                Value::Object(map) => map,
                _ => {
                    return Err(StoreError::InvalidRecord(format!(
                        "{} must contain a JSON object",
                        path.display()
                    )));
                },
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Store file not found, starting empty");
                Map::new()
            },
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            collections = data.values().filter(|v| v.is_array()).count(),
            "Store opened"
        );

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Creates a store that lives only in memory.
    pub fn in_memory(data: Map<String, Value>) -> Self {
        Self {
            path: None,
            data: RwLock::new(data),
        }
    }

    /// Returns the backing file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the collection names in document order.
    pub async fn collections(&self) -> Vec<String> {
        self.data
            .read()
            .await
            .iter()
            .filter(|(_, v)| v.is_array())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Lists the records of a collection matching every filter.
    ///
    /// Filter keys starting with `_` are reserved and ignored.
    pub async fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let data = self.data.read().await;
        let records = records(&data, collection)?;

        Ok(records
            .iter()
            .filter(|record| matches_filter(record, filter))
            .cloned()
            .collect())
    }

    /// Returns one record by id.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let data = self.data.read().await;
        records(&data, collection)?
            .iter()
            .find(|record| id_matches(record, id))
            .cloned()
            .ok_or_else(|| StoreError::record_not_found(collection, id))
    }

    /// Inserts a record, assigning an id when it has none.
    ///
    /// The collection is created if it does not exist yet.
    pub async fn insert(&self, collection: &str, record: Value) -> Result<Value, StoreError> {
        let mut record = into_object(record)?;

        self.mutate(|data| {
            let entry = data
                .entry(collection.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            let records = entry
                .as_array_mut()
                .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

            match record.get(ID_FIELD) {
                Some(id) => {
                    let id = id_string(id)?;
                    if records.iter().any(|r| id_matches(r, &id)) {
                        return Err(StoreError::conflict(collection, id));
                    }
                },
                None => {
                    let id = next_id(records).ok_or_else(|| {
                        StoreError::InvalidRecord(format!("no free numeric id left in {collection}"))
                    })?;
                    record.insert(ID_FIELD.to_string(), Value::from(id));
                },
            }

            let record = Value::Object(record);
            records.push(record.clone());
            debug!(collection, "Record inserted");
            Ok(record)
        })
        .await
    }

    /// Replaces a record, keeping its id.
    pub async fn replace(
        &self,
        collection: &str,
        id: &str,
        record: Value,
    ) -> Result<Value, StoreError> {
        let mut replacement = into_object(record)?;

        self.mutate(|data| {
            let existing = find_mut(data, collection, id)?;
            if let Some(existing_id) = existing.get(ID_FIELD) {
                replacement.insert(ID_FIELD.to_string(), existing_id.clone());
            }
            *existing = Value::Object(replacement);
            Ok(existing.clone())
        })
        .await
    }

    /// Merges top-level fields of `partial` into a record. The id cannot change.
    pub async fn patch(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Value, StoreError> {
        let mut partial = into_object(partial)?;
        partial.remove(ID_FIELD);

        self.mutate(|data| {
            let existing = find_mut(data, collection, id)?;
            if let Value::Object(fields) = existing {
                for (key, value) in partial {
                    fields.insert(key, value);
                }
            }
            Ok(existing.clone())
        })
        .await
    }

    /// Deletes a record and returns it.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        self.mutate(|data| {
            let records = data
                .get_mut(collection)
                .and_then(Value::as_array_mut)
                .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
            let index = records
                .iter()
                .position(|record| id_matches(record, id))
                .ok_or_else(|| StoreError::record_not_found(collection, id))?;
            Ok(records.remove(index))
        })
        .await
    }

    /// Applies `change` under the write lock.
    ///
    /// A file-backed store applies it to a copy and only swaps the copy in
    /// once it is on disk, so a failed write leaves memory untouched.
    async fn mutate<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Map<String, Value>) -> Result<T, StoreError>,
    {
        let mut data = self.data.write().await;

        if self.path.is_none() {
            return change(&mut *data);
        }

        let mut next = data.clone();
        let output = change(&mut next)?;
        self.persist(&next).await?;
        *data = next;
        Ok(output)
    }

    /// Writes the document next to the target and renames it into place.
    async fn persist(&self, data: &Map<String, Value>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(data)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), "Store persisted");
        Ok(())
    }
}

fn records<'a>(data: &'a Map<String, Value>, collection: &str) -> Result<&'a Vec<Value>, StoreError> {
    data.get(collection)
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))
}

fn find_mut<'a>(
    data: &'a mut Map<String, Value>,
    collection: &str,
    id: &str,
) -> Result<&'a mut Value, StoreError> {
    data.get_mut(collection)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?
        .iter_mut()
        .find(|record| id_matches(record, id))
        .ok_or_else(|| StoreError::record_not_found(collection, id))
}

fn into_object(value: Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// String form of an id; ids may be numbers or strings.
fn id_string(id: &Value) -> Result<String, StoreError> {
    match id {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(StoreError::InvalidRecord(
            "id must be a non-empty string or a number".to_string(),
        )),
    }
}

fn id_matches(record: &Value, id: &str) -> bool {
    record
        .get(ID_FIELD)
        .and_then(|v| id_string(v).ok())
        .is_some_and(|record_id| record_id == id)
}

/// One past the highest numeric id, counting numeric strings such as `"7"`.
///
/// Any id whose string form equals the result would parse to it, so the
/// result never collides. `None` once `u64::MAX` is taken.
fn next_id(records: &[Value]) -> Option<u64> {
    let max = records
        .iter()
        .filter_map(|r| match r.get(ID_FIELD)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse::<u64>().ok(),
            _ => None,
        })
        .max();

    match max {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

fn matches_filter(record: &Value, filter: &Filter) -> bool {
    filter
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .all(|(key, expected)| match record.get(key) {
            Some(Value::String(s)) => s == expected,
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string() == *expected,
            _ => false,
        })
}
