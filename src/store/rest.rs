//! PostgREST-style HTTP table store.
//!
//! Speaks the hosted store's REST dialect: tables under `rest/v1/`, equality
//! filters as `column=eq.value` query params, ordering as
//! `order=col.asc,col2.desc`, and `Prefer: return=representation` to get the
//! stored row back on insert.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use super::{Direction, SelectQuery, StoreError, TableStore};

#[derive(Clone)]
pub struct RestStore {
  http: reqwest::Client,
  base: Url,
  api_key: String,
}

impl RestStore {
  pub fn new(base_url: &str, api_key: String) -> Result<Self, StoreError> {
    // Url::join drops the last path segment unless the base ends with '/'.
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };
    let base = Url::parse(&normalized)
      .map_err(|e| StoreError::Decode(format!("invalid store url {}: {}", base_url, e)))?;

    Ok(Self {
      http: reqwest::Client::new(),
      base,
      api_key,
    })
  }

  fn table_url(&self, table: &str) -> Result<Url, StoreError> {
    self
      .base
      .join(&format!("rest/v1/{}", table))
      .map_err(|e| StoreError::Decode(format!("invalid table name {}: {}", table, e)))
  }

  fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
  }

  async fn check(
    &self,
    response: reqwest::Response,
    query: Option<&SelectQuery>,
  ) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    // Postgres reports a missing column as SQLSTATE 42703; surface it as
    // UnknownColumn so callers can retry with a fallback ordering.
    if status == StatusCode::BAD_REQUEST && body.contains("42703") {
      let column = query
        .map(|q| {
          q.order
            .iter()
            .map(|(column, _)| column.as_str())
            .find(|column| body.contains(*column))
            .unwrap_or("unknown")
        })
        .unwrap_or("unknown");
      return Err(StoreError::UnknownColumn(column.to_string()));
    }

    Err(StoreError::Status {
      status: status.as_u16(),
      body,
    })
  }
}

/// Render a JSON scalar the way PostgREST expects it in a filter value.
fn filter_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn order_param(order: &[(String, Direction)]) -> String {
  order
    .iter()
    .map(|(column, direction)| {
      let dir = match direction {
        Direction::Ascending => "asc",
        Direction::Descending => "desc",
      };
      format!("{}.{}", column, dir)
    })
    .collect::<Vec<_>>()
    .join(",")
}

#[async_trait]
impl TableStore for RestStore {
  async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
    let mut url = self.table_url(table)?;
    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("select", "*");
      if let Some((column, value)) = &query.filter {
        pairs.append_pair(column, &format!("eq.{}", filter_value(value)));
      }
      if !query.order.is_empty() {
        pairs.append_pair("order", &order_param(&query.order));
      }
    }

    let response = self.authed(self.http.get(url)).send().await?;
    let response = self.check(response, Some(query)).await?;
    let rows = response
      .json::<Vec<Value>>()
      .await
      .map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(rows)
  }

  async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
    let url = self.table_url(table)?;
    let response = self
      .authed(self.http.post(url))
      .header("Prefer", "return=representation")
      .json(&row)
      .send()
      .await?;
    let response = self.check(response, None).await?;

    // PostgREST answers an insert with an array of stored rows.
    let rows = response
      .json::<Vec<Value>>()
      .await
      .map_err(|e| StoreError::Decode(e.to_string()))?;
    rows
      .into_iter()
      .next()
      .ok_or_else(|| StoreError::Decode("insert returned no representation".to_string()))
  }

  async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError> {
    let mut url = self.table_url(table)?;
    url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));

    let response = self
      .authed(self.http.patch(url))
      .json(&patch)
      .send()
      .await?;
    self.check(response, None).await?;
    Ok(())
  }

  async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
    let mut url = self.table_url(table)?;
    url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));

    let response = self.authed(self.http.delete(url)).send().await?;
    self.check(response, None).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn order_param_renders_directions() {
    let order = vec![
      ("sort_order".to_string(), Direction::Ascending),
      ("published_at".to_string(), Direction::Descending),
    ];
    assert_eq!(order_param(&order), "sort_order.asc,published_at.desc");
  }

  #[test]
  fn filter_value_keeps_strings_bare() {
    assert_eq!(filter_value(&json!("abc")), "abc");
    assert_eq!(filter_value(&json!(true)), "true");
    assert_eq!(filter_value(&json!(7)), "7");
  }

  #[test]
  fn base_url_slash_is_normalized() {
    let store = RestStore::new("https://example.supabase.co", "key".into()).unwrap();
    let url = store.table_url("news").unwrap();
    assert_eq!(url.as_str(), "https://example.supabase.co/rest/v1/news");
  }
}
