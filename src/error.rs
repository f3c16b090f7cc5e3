//! Error types for the data-access layer.
//!
//! The façade never panics and never lets a raw transport error escape
//! untyped: everything callers see is a `DataError`. "Not found" is not an
//! error anywhere in this crate; lookups return `Ok(None)` instead.

use thiserror::Error;

use crate::store::StoreError;

/// Error returned by the data manager façade.
#[derive(Debug, Error)]
pub enum DataError {
  /// The remote store rejected or failed the operation.
  #[error(transparent)]
  Store(#[from] StoreError),

  /// A row came back from the store in a shape we could not map.
  #[error("malformed {table} row: {message}")]
  Row {
    table: &'static str,
    message: String,
  },
}

impl DataError {
  pub fn row(table: &'static str, err: impl std::fmt::Display) -> Self {
    Self::Row {
      table,
      message: err.to_string(),
    }
  }
}
