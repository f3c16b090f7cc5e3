//! Remote table store abstraction.
//!
//! The data manager only needs four row-level capabilities against named
//! logical tables: "fetch rows matching X ordered by Y", "insert row",
//! "update row by id", "delete row by id". `TableStore` captures exactly
//! that; the concrete wire protocol lives behind it.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a table store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Transport-level failure (connection refused, DNS, TLS...).
  #[error("transport error: {0}")]
  Http(#[from] reqwest::Error),

  /// The store answered with a non-success status.
  #[error("store returned {status}: {body}")]
  Status { status: u16, body: String },

  /// An order/filter column does not exist on the table. Callers use this
  /// to fall back to a secondary ordering key.
  #[error("unknown column `{0}`")]
  UnknownColumn(String),

  /// The store answered with a body we could not interpret.
  #[error("malformed store response: {0}")]
  Decode(String),
}

/// Sort direction for a `SelectQuery` ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ascending,
  Descending,
}

/// A row selection: optional equality filter plus ordering keys.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
  pub filter: Option<(String, Value)>,
  pub order: Vec<(String, Direction)>,
}

impl SelectQuery {
  pub fn new() -> Self {
    Self::default()
  }

  /// Keep only rows whose `column` equals `value`.
  pub fn eq(mut self, column: &str, value: Value) -> Self {
    self.filter = Some((column.to_string(), value));
    self
  }

  /// Add an ordering key. Keys apply in the order they were added.
  pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
    self.order.push((column.to_string(), direction));
    self
  }
}

/// Row-level operations against named logical tables.
#[async_trait]
pub trait TableStore: Send + Sync {
  /// Fetch rows matching the query, in the requested order.
  async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>, StoreError>;

  /// Insert a row and return the stored representation.
  async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError>;

  /// Merge `patch` into the row with the given id.
  async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError>;

  /// Delete the row with the given id.
  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;
}
