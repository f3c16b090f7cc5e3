//! Serde types matching the remote store's wire rows.
//!
//! Kept separate from the domain types so loose column data can be
//! deserialized leniently (nulls defaulted, numbers-as-strings tolerated)
//! without that looseness leaking into the public API. Mutations go the
//! other way through the `*Insert`/`*PatchRow` builders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DataError;

use super::types::{
  kickoff_from_local, Article, ArticlePatch, Match, MatchPatch, MatchStatus, NewArticle, NewMatch,
  NewPlayer, NewStaffMember, Player, PlayerPatch, Position, StaffMember, StaffPatch,
};

// ============================================================================
// Lenient scalar deserializers
// ============================================================================

/// Accept a number or a numeric string; anything else becomes `None`.
/// Historical rows stored jersey numbers and career counters as text.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.as_ref().and_then(value_as_u32))
}

fn value_as_u32(value: &Value) -> Option<u32> {
  match value {
    Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.as_ref().and_then(|v| match v {
    Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }))
}

/// Drop empty strings so the domain sees `None` instead of `Some("")`.
fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .ok()
}

/// Birth dates arrive as `YYYY-MM-DD`, occasionally with a time suffix.
fn parse_date(value: &str) -> Option<NaiveDate> {
  let prefix = value.get(0..10).unwrap_or(value);
  NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

// ============================================================================
// Articles
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ArticleRow {
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub excerpt: String,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub author: String,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub slug: String,
  #[serde(default)]
  pub published_at: String,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub images: Option<Vec<String>>,
  #[serde(default)]
  pub video_url: Option<String>,
  #[serde(default)]
  pub tags: Option<Vec<String>>,
  #[serde(default)]
  pub sort_order: Option<i64>,
}

impl ArticleRow {
  pub fn into_domain(self) -> Article {
    Article {
      id: self.id,
      title: self.title,
      excerpt: self.excerpt,
      body: self.content,
      category: self.category,
      author: self.author,
      featured: self.featured,
      slug: self.slug,
      published_at: parse_timestamp(&self.published_at).unwrap_or(DateTime::UNIX_EPOCH),
      image_url: non_empty(self.image_url),
      gallery: self.images.unwrap_or_default(),
      video_url: non_empty(self.video_url),
      tags: self.tags.unwrap_or_default(),
      sort_order: self.sort_order,
    }
  }
}

pub fn article_from_value(value: Value) -> Result<Article, DataError> {
  let row: ArticleRow =
    serde_json::from_value(value).map_err(|e| DataError::row("news", e))?;
  Ok(row.into_domain())
}

#[derive(Serialize)]
struct ArticleInsertRow<'a> {
  id: &'a str,
  title: &'a str,
  excerpt: &'a str,
  content: &'a str,
  category: &'a str,
  author: &'a str,
  featured: bool,
  slug: &'a str,
  published_at: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  image_url: Option<&'a str>,
  images: &'a [String],
  #[serde(skip_serializing_if = "Option::is_none")]
  video_url: Option<&'a str>,
  tags: &'a [String],
}

pub fn article_insert(
  id: &str,
  new: &NewArticle,
  slug: &str,
  published_at: DateTime<Utc>,
) -> Value {
  let row = ArticleInsertRow {
    id,
    title: &new.title,
    excerpt: &new.excerpt,
    content: &new.body,
    category: &new.category,
    author: &new.author,
    featured: new.featured,
    slug,
    published_at: published_at.to_rfc3339(),
    image_url: new.image_url.as_deref(),
    images: &new.gallery,
    video_url: new.video_url.as_deref(),
    tags: &new.tags,
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

#[derive(Serialize)]
struct ArticlePatchRow<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  title: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  excerpt: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  content: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  category: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  author: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  featured: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  slug: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  image_url: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  images: Option<&'a [String]>,
  #[serde(skip_serializing_if = "Option::is_none")]
  video_url: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  tags: Option<&'a [String]>,
  #[serde(skip_serializing_if = "Option::is_none")]
  sort_order: Option<i64>,
}

pub fn article_patch(patch: &ArticlePatch) -> Value {
  let row = ArticlePatchRow {
    title: patch.title.as_deref(),
    excerpt: patch.excerpt.as_deref(),
    content: patch.body.as_deref(),
    category: patch.category.as_deref(),
    author: patch.author.as_deref(),
    featured: patch.featured,
    slug: patch.slug.as_deref(),
    image_url: patch.image_url.as_deref(),
    images: patch.gallery.as_deref(),
    video_url: patch.video_url.as_deref(),
    tags: patch.tags.as_deref(),
    sort_order: patch.sort_order,
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

// ============================================================================
// Players
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayerRow {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub position: String,
  #[serde(default, deserialize_with = "lenient_u32")]
  pub number: Option<u32>,
  #[serde(default, deserialize_with = "lenient_i32")]
  pub age: Option<i32>,
  #[serde(default)]
  pub birth_date: Option<String>,
  #[serde(default)]
  pub nationality: String,
  #[serde(default)]
  pub height: Option<String>,
  #[serde(default)]
  pub weight: Option<String>,
  #[serde(default, deserialize_with = "lenient_u32")]
  pub matches: Option<u32>,
  #[serde(default, deserialize_with = "lenient_u32")]
  pub goals: Option<u32>,
  #[serde(default, deserialize_with = "lenient_u32")]
  pub assists: Option<u32>,
  #[serde(default)]
  pub image_url: Option<String>,
}

impl PlayerRow {
  pub fn into_domain(self) -> Player {
    Player {
      id: self.id,
      name: self.name,
      position: Position::parse(&self.position),
      number: self.number.unwrap_or(0),
      age: self.age.unwrap_or(0),
      birth_date: self.birth_date.as_deref().and_then(parse_date),
      nationality: self.nationality,
      height: non_empty(self.height),
      weight: non_empty(self.weight),
      matches: self.matches,
      goals: self.goals,
      assists: self.assists,
      photo_url: non_empty(self.image_url),
    }
  }
}

pub fn player_from_value(value: Value) -> Result<Player, DataError> {
  let row: PlayerRow =
    serde_json::from_value(value).map_err(|e| DataError::row("players", e))?;
  Ok(row.into_domain())
}

#[derive(Serialize)]
struct PlayerInsertRow<'a> {
  id: &'a str,
  name: &'a str,
  position: &'a str,
  number: u32,
  age: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  birth_date: Option<String>,
  nationality: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  height: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  weight: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  matches: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  goals: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  assists: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  image_url: Option<&'a str>,
}

pub fn player_insert(id: &str, new: &NewPlayer, age: i32) -> Value {
  let row = PlayerInsertRow {
    id,
    name: &new.name,
    position: new.position.as_key(),
    number: new.number,
    age,
    birth_date: new.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
    nationality: &new.nationality,
    height: new.height.as_deref(),
    weight: new.weight.as_deref(),
    matches: new.matches,
    goals: new.goals,
    assists: new.assists,
    image_url: new.photo_url.as_deref(),
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

#[derive(Serialize)]
struct PlayerPatchRow<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  name: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  position: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  number: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  age: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  birth_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  nationality: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  height: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  weight: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  matches: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  goals: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  assists: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  image_url: Option<&'a str>,
}

pub fn player_patch(patch: &PlayerPatch) -> Value {
  let row = PlayerPatchRow {
    name: patch.name.as_deref(),
    position: patch.position.as_ref().map(Position::as_key),
    number: patch.number,
    age: patch.age,
    birth_date: patch.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
    nationality: patch.nationality.as_deref(),
    height: patch.height.as_deref(),
    weight: patch.weight.as_deref(),
    matches: patch.matches,
    goals: patch.goals,
    assists: patch.assists,
    image_url: patch.photo_url.as_deref(),
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

// ============================================================================
// Staff
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StaffRow {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub role: String,
  #[serde(default)]
  pub image_url: Option<String>,
}

impl StaffRow {
  pub fn into_domain(self) -> StaffMember {
    StaffMember {
      id: self.id,
      name: self.name,
      role: self.role,
      photo_url: non_empty(self.image_url),
    }
  }
}

pub fn staff_from_value(value: Value) -> Result<StaffMember, DataError> {
  let row: StaffRow = serde_json::from_value(value).map_err(|e| DataError::row("staff", e))?;
  Ok(row.into_domain())
}

#[derive(Serialize)]
struct StaffInsertRow<'a> {
  id: &'a str,
  name: &'a str,
  role: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  image_url: Option<&'a str>,
}

pub fn staff_insert(id: &str, new: &NewStaffMember) -> Value {
  let row = StaffInsertRow {
    id,
    name: &new.name,
    role: &new.role,
    image_url: new.photo_url.as_deref(),
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

#[derive(Serialize)]
struct StaffPatchRow<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  name: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  image_url: Option<&'a str>,
}

pub fn staff_patch(patch: &StaffPatch) -> Value {
  let row = StaffPatchRow {
    name: patch.name.as_deref(),
    role: patch.role.as_deref(),
    image_url: patch.photo_url.as_deref(),
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

// ============================================================================
// Matches
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MatchRow {
  pub id: String,
  #[serde(default)]
  pub home: String,
  #[serde(default)]
  pub away: String,
  #[serde(default, deserialize_with = "lenient_i32")]
  pub home_score: Option<i32>,
  #[serde(default, deserialize_with = "lenient_i32")]
  pub away_score: Option<i32>,
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub tournament: String,
  #[serde(default)]
  pub stadium: String,
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub home_logo: Option<String>,
  #[serde(default)]
  pub away_logo: Option<String>,
}

impl MatchRow {
  pub fn into_domain(self) -> Match {
    let kickoff = DateTime::parse_from_rfc3339(&self.date)
      .ok()
      .or_else(|| {
        // Some rows predate the offset fix and carry a bare civil time.
        chrono::NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%dT%H:%M")
          .ok()
          .map(kickoff_from_local)
      })
      .unwrap_or_else(|| DateTime::UNIX_EPOCH.with_timezone(&super::types::club_offset()));

    Match {
      id: self.id,
      home: self.home,
      away: self.away,
      home_score: self.home_score,
      away_score: self.away_score,
      kickoff,
      tournament: self.tournament,
      venue: self.stadium,
      status: MatchStatus::parse(&self.status).unwrap_or(MatchStatus::Upcoming),
      home_logo: non_empty(self.home_logo),
      away_logo: non_empty(self.away_logo),
    }
  }
}

pub fn match_from_value(value: Value) -> Result<Match, DataError> {
  let row: MatchRow =
    serde_json::from_value(value).map_err(|e| DataError::row("matches", e))?;
  Ok(row.into_domain())
}

#[derive(Serialize)]
struct MatchInsertRow<'a> {
  id: &'a str,
  home: &'a str,
  away: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  home_score: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  away_score: Option<i32>,
  date: String,
  tournament: &'a str,
  stadium: &'a str,
  status: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  home_logo: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  away_logo: Option<&'a str>,
}

pub fn match_insert(id: &str, new: &NewMatch) -> Value {
  let row = MatchInsertRow {
    id,
    home: &new.home,
    away: &new.away,
    home_score: new.home_score,
    away_score: new.away_score,
    date: kickoff_from_local(new.kickoff_local).to_rfc3339(),
    tournament: &new.tournament,
    stadium: &new.venue,
    status: new.status.as_str(),
    home_logo: new.home_logo.as_deref(),
    away_logo: new.away_logo.as_deref(),
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

#[derive(Serialize)]
struct MatchPatchRow<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  home: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  away: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  home_score: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  away_score: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  tournament: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  stadium: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  status: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  home_logo: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  away_logo: Option<&'a str>,
}

pub fn match_patch(patch: &MatchPatch) -> Value {
  let row = MatchPatchRow {
    home: patch.home.as_deref(),
    away: patch.away.as_deref(),
    home_score: patch.home_score,
    away_score: patch.away_score,
    date: patch
      .kickoff_local
      .map(|local| kickoff_from_local(local).to_rfc3339()),
    tournament: patch.tournament.as_deref(),
    stadium: patch.venue.as_deref(),
    status: patch.status.map(|s| s.as_str()),
    home_logo: patch.home_logo.as_deref(),
    away_logo: patch.away_logo.as_deref(),
  };
  serde_json::to_value(row).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn article_row_defaults_missing_optionals() {
    let article = article_from_value(json!({
      "id": "n1",
      "title": "Título",
      "published_at": "2024-05-01T12:00:00Z",
      "video_url": "",
      "images": null,
    }))
    .unwrap();

    assert_eq!(article.id, "n1");
    assert_eq!(article.video_url, None);
    assert!(article.gallery.is_empty());
    assert!(article.tags.is_empty());
    assert_eq!(article.sort_order, None);
    assert_eq!(article.published_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
  }

  #[test]
  fn article_row_without_id_is_rejected() {
    assert!(article_from_value(json!({ "title": "sin id" })).is_err());
  }

  #[test]
  fn player_row_tolerates_stringly_numbers() {
    let player = player_from_value(json!({
      "id": "p1",
      "name": "Juan",
      "position": "Delantero",
      "number": "9",
      "age": 27,
      "goals": "12",
    }))
    .unwrap();

    assert_eq!(player.number, 9);
    assert_eq!(player.age, 27);
    assert_eq!(player.goals, Some(12));
    assert_eq!(player.position, Position::Forward);
  }

  #[test]
  fn match_row_unknown_status_defaults_to_upcoming() {
    let fixture = match_from_value(json!({
      "id": "m1",
      "home": "Local",
      "away": "Visitante",
      "date": "2025-03-09T21:30:00-03:00",
      "status": "???",
    }))
    .unwrap();

    assert_eq!(fixture.status, MatchStatus::Upcoming);
    assert_eq!(fixture.kickoff.to_rfc3339(), "2025-03-09T21:30:00-03:00");
  }

  #[test]
  fn patch_rows_omit_unset_fields() {
    let patch = ArticlePatch {
      featured: Some(true),
      ..Default::default()
    };
    let value = article_patch(&patch);
    assert_eq!(value, json!({ "featured": true }));
  }
}
