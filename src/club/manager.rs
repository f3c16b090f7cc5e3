//! Cached CRUD façade over the remote table store.
//!
//! One instance owns the per-entity caches and hides the wire details:
//! reads are cache-first, every mutation invalidates the whole cache for
//! that entity type, and the featured-article limit is maintained on the
//! way through. All methods return typed results so callers can tell
//! "store down" from "legitimately empty"; nothing here panics.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{Local, Utc};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cache::ListCache;
use crate::error::DataError;
use crate::store::{Direction, SelectQuery, StoreError, TableStore};

use super::rows;
use super::slug::slugify;
use super::types::{
  age_on, Article, ArticlePatch, Match, MatchPatch, MatchStatus, NewArticle, NewMatch, NewPlayer,
  NewStaffMember, Player, PlayerPatch, StaffMember, StaffPatch, MAX_FEATURED,
};

const NEWS_TABLE: &str = "news";
const PLAYERS_TABLE: &str = "players";
const STAFF_TABLE: &str = "staff";
const MATCHES_TABLE: &str = "matches";

pub struct DataManager {
  store: Arc<dyn TableStore>,
  articles: ListCache<Article>,
  players: ListCache<Player>,
  staff: ListCache<StaffMember>,
  matches: ListCache<Match>,
}

/// Log and convert a failed store call. Keeps the call sites flat.
fn check<T>(operation: &'static str, result: Result<T, StoreError>) -> Result<T, DataError> {
  result.map_err(|e| {
    error!(operation, error = %e, "remote store call failed");
    DataError::from(e)
  })
}

impl DataManager {
  pub fn new(store: Arc<dyn TableStore>) -> Self {
    Self {
      store,
      articles: ListCache::new(),
      players: ListCache::new(),
      staff: ListCache::new(),
      matches: ListCache::new(),
    }
  }

  // ==========================================================================
  // Articles
  // ==========================================================================

  /// All articles, manual rank first, then most recent. Cache-first.
  pub async fn articles(&self) -> Result<Vec<Article>, DataError> {
    if let Some(cached) = self.articles.snapshot() {
      return Ok(cached);
    }

    let raw = check("list articles", self.select_articles().await)?;
    let mut items = raw
      .into_iter()
      .map(rows::article_from_value)
      .collect::<Result<Vec<_>, _>>()?;

    // Ranked articles first in rank order, then everything unranked by
    // recency. Unranked sorts as the largest rank so the key is total.
    items.sort_by_key(|a| (a.sort_order.unwrap_or(i64::MAX), Reverse(a.published_at)));

    self.articles.fill(items.clone());
    Ok(items)
  }

  /// The remote rank column may not exist yet on older deployments; retry
  /// ordered by publish time alone instead of failing the listing.
  async fn select_articles(&self) -> Result<Vec<Value>, StoreError> {
    let ranked = SelectQuery::new()
      .order_by("sort_order", Direction::Ascending)
      .order_by("published_at", Direction::Descending);
    match self.store.select(NEWS_TABLE, &ranked).await {
      Err(StoreError::UnknownColumn(column)) => {
        warn!(column = %column, "rank column missing, ordering by publish time");
        let recency = SelectQuery::new().order_by("published_at", Direction::Descending);
        self.store.select(NEWS_TABLE, &recency).await
      }
      other => other,
    }
  }

  /// The featured articles, most recent first, capped at the limit.
  pub async fn featured_articles(&self) -> Result<Vec<Article>, DataError> {
    let mut featured: Vec<Article> = self
      .articles()
      .await?
      .into_iter()
      .filter(|a| a.featured)
      .collect();
    featured.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    featured.truncate(MAX_FEATURED);
    Ok(featured)
  }

  /// Articles in site order: featured first, then the rest.
  pub async fn site_articles(&self) -> Result<Vec<Article>, DataError> {
    let all = self.articles().await?;
    let featured = self.featured_articles().await?;
    let rest = all.into_iter().filter(|a| !a.featured);
    Ok(featured.into_iter().chain(rest).collect())
  }

  pub async fn article_by_id(&self, id: &str) -> Result<Option<Article>, DataError> {
    Ok(self.articles().await?.into_iter().find(|a| a.id == id))
  }

  /// Point lookup against the store; used by public article pages where
  /// hitting a single row beats hydrating the whole list.
  pub async fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, DataError> {
    let query = SelectQuery::new().eq("slug", json!(slug));
    let raw = check("fetch article by slug", self.store.select(NEWS_TABLE, &query).await)?;
    match raw.into_iter().next() {
      Some(row) => Ok(Some(rows::article_from_value(row)?)),
      None => Ok(None),
    }
  }

  /// Create an article. Identity and publication time are assigned here;
  /// the slug falls back to one derived from the title.
  pub async fn create_article(&self, new: NewArticle) -> Result<Article, DataError> {
    let id = Uuid::new_v4().to_string();
    let published_at = new.published_at.unwrap_or_else(Utc::now);
    let slug = match new.slug.as_deref() {
      Some(s) if !s.trim().is_empty() => s.to_string(),
      _ => slugify(&new.title),
    };

    let row = rows::article_insert(&id, &new, &slug, published_at);
    let stored = check("create article", self.store.insert(NEWS_TABLE, row).await)?;
    let article = rows::article_from_value(stored)?;

    if article.featured {
      self.maintain_featured_limit(&article.id).await;
    }
    self.articles.invalidate();
    Ok(article)
  }

  pub async fn update_article(&self, id: &str, patch: ArticlePatch) -> Result<(), DataError> {
    let featured = patch.featured == Some(true);
    let body = rows::article_patch(&patch);
    check("update article", self.store.update(NEWS_TABLE, id, body).await)?;

    if featured {
      self.maintain_featured_limit(id).await;
    }
    self.articles.invalidate();
    Ok(())
  }

  /// Rewrite the manual rank of one article (drag-drop reordering).
  pub async fn set_article_order(&self, id: &str, rank: i64) -> Result<(), DataError> {
    let body = json!({ "sort_order": rank });
    check("reorder article", self.store.update(NEWS_TABLE, id, body).await)?;
    self.articles.invalidate();
    Ok(())
  }

  pub async fn delete_article(&self, id: &str) -> Result<(), DataError> {
    check("delete article", self.store.delete(NEWS_TABLE, id).await)?;
    self.articles.invalidate();
    Ok(())
  }

  /// Keep the featured set at the limit: when it would exceed the cap,
  /// demote the oldest-by-publish-time entry, never the article currently
  /// being written.
  ///
  /// Best-effort and non-atomic by design: concurrent writers can
  /// transiently exceed the limit. Failures are logged, not propagated,
  /// so a flaky demotion never fails the write that triggered it.
  async fn maintain_featured_limit(&self, current_id: &str) {
    let query = SelectQuery::new()
      .eq("featured", json!(true))
      .order_by("published_at", Direction::Descending);

    let raw = match self.store.select(NEWS_TABLE, &query).await {
      Ok(raw) => raw,
      Err(e) => {
        warn!(error = %e, "featured-limit check skipped");
        return;
      }
    };
    if raw.len() <= MAX_FEATURED {
      return;
    }

    let Some(oldest_id) = raw.last().and_then(|row| row.get("id")).and_then(Value::as_str)
    else {
      return;
    };
    if oldest_id == current_id {
      return;
    }

    match self
      .store
      .update(NEWS_TABLE, oldest_id, json!({ "featured": false }))
      .await
    {
      Ok(()) => info!(article = oldest_id, "demoted oldest featured article"),
      Err(e) => warn!(article = oldest_id, error = %e, "failed to demote featured article"),
    }
  }

  /// One-shot maintenance: demote every featured article beyond the three
  /// most recent. Returns how many were demoted.
  pub async fn cleanup_featured(&self) -> Result<usize, DataError> {
    let query = SelectQuery::new()
      .eq("featured", json!(true))
      .order_by("published_at", Direction::Descending);
    let raw = check("list featured articles", self.store.select(NEWS_TABLE, &query).await)?;

    let mut demoted = 0;
    let mut failure = None;
    for row in raw.iter().skip(MAX_FEATURED) {
      let Some(id) = row.get("id").and_then(Value::as_str) else {
        continue;
      };
      match check(
        "demote featured article",
        self
          .store
          .update(NEWS_TABLE, id, json!({ "featured": false }))
          .await,
      ) {
        Ok(()) => {
          info!(article = id, "demoted featured article in cleanup");
          demoted += 1;
        }
        Err(e) => {
          failure = Some(e);
          break;
        }
      }
    }

    // Rows already demoted must not keep serving from the cache, even when
    // a later demotion failed.
    if demoted > 0 {
      self.articles.invalidate();
    }
    match failure {
      Some(e) => Err(e),
      None => Ok(demoted),
    }
  }

  // ==========================================================================
  // Players
  // ==========================================================================

  /// The squad, ordered by jersey number. Cache-first.
  pub async fn players(&self) -> Result<Vec<Player>, DataError> {
    if let Some(cached) = self.players.snapshot() {
      return Ok(cached);
    }

    let query = SelectQuery::new().order_by("number", Direction::Ascending);
    let raw = check("list players", self.store.select(PLAYERS_TABLE, &query).await)?;
    let items = raw
      .into_iter()
      .map(rows::player_from_value)
      .collect::<Result<Vec<_>, _>>()?;

    self.players.fill(items.clone());
    Ok(items)
  }

  pub async fn player_by_id(&self, id: &str) -> Result<Option<Player>, DataError> {
    Ok(self.players().await?.into_iter().find(|p| p.id == id))
  }

  pub async fn create_player(&self, new: NewPlayer) -> Result<Player, DataError> {
    let id = Uuid::new_v4().to_string();
    // Birth date wins over a manually supplied age.
    let age = match new.birth_date {
      Some(birth) => age_on(birth, Local::now().date_naive()),
      None => new.age.unwrap_or(0),
    };

    let row = rows::player_insert(&id, &new, age);
    let stored = check("create player", self.store.insert(PLAYERS_TABLE, row).await)?;
    let player = rows::player_from_value(stored)?;

    self.players.invalidate();
    Ok(player)
  }

  pub async fn update_player(&self, id: &str, mut patch: PlayerPatch) -> Result<(), DataError> {
    if let Some(birth) = patch.birth_date {
      patch.age = Some(age_on(birth, Local::now().date_naive()));
    }

    let body = rows::player_patch(&patch);
    check("update player", self.store.update(PLAYERS_TABLE, id, body).await)?;
    self.players.invalidate();
    Ok(())
  }

  pub async fn delete_player(&self, id: &str) -> Result<(), DataError> {
    check("delete player", self.store.delete(PLAYERS_TABLE, id).await)?;
    self.players.invalidate();
    Ok(())
  }

  // ==========================================================================
  // Staff
  // ==========================================================================

  /// Staff members, ordered by name. Cache-first.
  pub async fn staff(&self) -> Result<Vec<StaffMember>, DataError> {
    if let Some(cached) = self.staff.snapshot() {
      return Ok(cached);
    }

    let query = SelectQuery::new().order_by("name", Direction::Ascending);
    let raw = check("list staff", self.store.select(STAFF_TABLE, &query).await)?;
    let items = raw
      .into_iter()
      .map(rows::staff_from_value)
      .collect::<Result<Vec<_>, _>>()?;

    self.staff.fill(items.clone());
    Ok(items)
  }

  pub async fn staff_by_id(&self, id: &str) -> Result<Option<StaffMember>, DataError> {
    Ok(self.staff().await?.into_iter().find(|s| s.id == id))
  }

  pub async fn create_staff(&self, new: NewStaffMember) -> Result<StaffMember, DataError> {
    let id = Uuid::new_v4().to_string();
    let row = rows::staff_insert(&id, &new);
    let stored = check("create staff", self.store.insert(STAFF_TABLE, row).await)?;
    let member = rows::staff_from_value(stored)?;

    self.staff.invalidate();
    Ok(member)
  }

  pub async fn update_staff(&self, id: &str, patch: StaffPatch) -> Result<(), DataError> {
    let body = rows::staff_patch(&patch);
    check("update staff", self.store.update(STAFF_TABLE, id, body).await)?;
    self.staff.invalidate();
    Ok(())
  }

  pub async fn delete_staff(&self, id: &str) -> Result<(), DataError> {
    check("delete staff", self.store.delete(STAFF_TABLE, id).await)?;
    self.staff.invalidate();
    Ok(())
  }

  // ==========================================================================
  // Matches
  // ==========================================================================

  /// Fixtures and results, ordered by kickoff. Cache-first.
  pub async fn matches(&self) -> Result<Vec<Match>, DataError> {
    if let Some(cached) = self.matches.snapshot() {
      return Ok(cached);
    }

    let query = SelectQuery::new().order_by("date", Direction::Ascending);
    let raw = check("list matches", self.store.select(MATCHES_TABLE, &query).await)?;
    let items = raw
      .into_iter()
      .map(rows::match_from_value)
      .collect::<Result<Vec<_>, _>>()?;

    self.matches.fill(items.clone());
    Ok(items)
  }

  pub async fn match_by_id(&self, id: &str) -> Result<Option<Match>, DataError> {
    Ok(self.matches().await?.into_iter().find(|m| m.id == id))
  }

  pub async fn create_match(&self, new: NewMatch) -> Result<Match, DataError> {
    if new.status == MatchStatus::Finished
      && (new.home_score.is_none() || new.away_score.is_none())
    {
      // Soft expectation only; editors sometimes record the result later.
      warn!(home = %new.home, away = %new.away, "finished match without both scores");
    }

    let id = Uuid::new_v4().to_string();
    let row = rows::match_insert(&id, &new);
    let stored = check("create match", self.store.insert(MATCHES_TABLE, row).await)?;
    let fixture = rows::match_from_value(stored)?;

    self.matches.invalidate();
    Ok(fixture)
  }

  pub async fn update_match(&self, id: &str, patch: MatchPatch) -> Result<(), DataError> {
    if patch.status == Some(MatchStatus::Finished)
      && (patch.home_score.is_none() || patch.away_score.is_none())
    {
      warn!(id, "match marked finished without both scores in the same update");
    }

    let body = rows::match_patch(&patch);
    check("update match", self.store.update(MATCHES_TABLE, id, body).await)?;
    self.matches.invalidate();
    Ok(())
  }

  pub async fn delete_match(&self, id: &str) -> Result<(), DataError> {
    check("delete match", self.store.delete(MATCHES_TABLE, id).await)?;
    self.matches.invalidate();
    Ok(())
  }
}
