//! In-memory table store.
//!
//! Backs tests and offline demos. Rows are plain JSON objects keyed by their
//! `id` field, per table. Ordering and filtering follow the same contract as
//! the REST store, including `UnknownColumn` when asked to order by a column
//! no row in the table carries.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{self, AtomicBool};
use std::sync::{Mutex, PoisonError};

use super::{Direction, SelectQuery, StoreError, TableStore};

#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<HashMap<String, Vec<Value>>>,
  offline: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make every subsequent operation fail as if the store were unreachable.
  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, atomic::Ordering::SeqCst);
  }

  fn check_online(&self) -> Result<(), StoreError> {
    if self.offline.load(atomic::Ordering::SeqCst) {
      return Err(StoreError::Status {
        status: 503,
        body: "store offline".to_string(),
      });
    }
    Ok(())
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Value>>> {
    self.tables.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[async_trait]
impl TableStore for MemoryStore {
  async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
    self.check_online()?;
    let tables = self.lock();
    let rows = tables.get(table).cloned().unwrap_or_default();

    let mut rows: Vec<Value> = match &query.filter {
      Some((column, value)) => rows
        .into_iter()
        .filter(|row| row.get(column) == Some(value))
        .collect(),
      None => rows,
    };

    for (column, _) in &query.order {
      let known = rows.iter().any(|row| row.get(column).is_some());
      if !rows.is_empty() && !known {
        return Err(StoreError::UnknownColumn(column.clone()));
      }
    }

    // Apply ordering keys from last to first so the first key dominates.
    for (column, direction) in query.order.iter().rev() {
      rows.sort_by(|a, b| {
        let ord = compare_values(a.get(column), b.get(column));
        match direction {
          Direction::Ascending => ord,
          Direction::Descending => ord.reverse(),
        }
      });
    }

    Ok(rows)
  }

  async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
    self.check_online()?;
    if !row.is_object() {
      return Err(StoreError::Decode("insert payload is not an object".to_string()));
    }
    self
      .lock()
      .entry(table.to_string())
      .or_default()
      .push(row.clone());
    Ok(row)
  }

  async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError> {
    self.check_online()?;
    let patch = patch
      .as_object()
      .ok_or_else(|| StoreError::Decode("update payload is not an object".to_string()))?;
    let mut tables = self.lock();
    if let Some(rows) = tables.get_mut(table) {
      for row in rows.iter_mut() {
        if row.get("id").and_then(Value::as_str) == Some(id) {
          if let Some(fields) = row.as_object_mut() {
            for (key, value) in patch {
              fields.insert(key.clone(), value.clone());
            }
          }
        }
      }
    }
    // Updating a missing row is a no-op, like a filtered UPDATE matching zero rows.
    Ok(())
  }

  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
    self.check_online()?;
    let mut tables = self.lock();
    if let Some(rows) = tables.get_mut(table) {
      rows.retain(|row| row.get("id").and_then(Value::as_str) != Some(id));
    }
    Ok(())
  }
}

/// Order JSON values the way the remote store would: null/missing last,
/// numbers numerically, strings lexically (RFC 3339 timestamps sort
/// correctly this way), booleans false-before-true.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
  match (a, b) {
    (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
    (None | Some(Value::Null), Some(_)) => Ordering::Greater,
    (Some(_), None | Some(Value::Null)) => Ordering::Less,
    (Some(Value::Number(x)), Some(Value::Number(y))) => x
      .as_f64()
      .partial_cmp(&y.as_f64())
      .unwrap_or(Ordering::Equal),
    (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
    (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
    _ => Ordering::Equal,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn filter_and_order() {
    let store = MemoryStore::new();
    for (id, number) in [("a", 10), ("b", 4), ("c", 7)] {
      store
        .insert("players", json!({ "id": id, "number": number, "active": true }))
        .await
        .unwrap();
    }

    let query = SelectQuery::new().order_by("number", Direction::Ascending);
    let rows = store.select("players", &query).await.unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["b", "c", "a"]);

    let query = SelectQuery::new().eq("id", json!("b"));
    let rows = store.select("players", &query).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["number"], json!(4));
  }

  #[tokio::test]
  async fn unknown_order_column_is_signaled() {
    let store = MemoryStore::new();
    store
      .insert("news", json!({ "id": "a", "title": "x" }))
      .await
      .unwrap();

    let query = SelectQuery::new().order_by("sort_order", Direction::Ascending);
    let err = store.select("news", &query).await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownColumn(c) if c == "sort_order"));
  }

  #[tokio::test]
  async fn update_merges_and_delete_removes() {
    let store = MemoryStore::new();
    store
      .insert("staff", json!({ "id": "s1", "name": "Ana", "role": "DT" }))
      .await
      .unwrap();

    store
      .update("staff", "s1", json!({ "role": "Preparador" }))
      .await
      .unwrap();
    let rows = store.select("staff", &SelectQuery::new()).await.unwrap();
    assert_eq!(rows[0]["role"], json!("Preparador"));
    assert_eq!(rows[0]["name"], json!("Ana"));

    store.delete("staff", "s1").await.unwrap();
    let rows = store.select("staff", &SelectQuery::new()).await.unwrap();
    assert!(rows.is_empty());
  }

  #[tokio::test]
  async fn offline_fails_every_operation() {
    let store = MemoryStore::new();
    store.set_offline(true);
    let err = store.select("news", &SelectQuery::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 503, .. }));
  }
}
