//! Domain types for the club site: articles, players, staff and matches.
//!
//! These are the shapes the UI layer consumes. Wire rows (snake_case store
//! columns) live in `rows` and are mapped here at the boundary.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// How many articles may be featured at once.
pub const MAX_FEATURED: usize = 3;

// ============================================================================
// Articles
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
  pub id: String,
  pub title: String,
  pub excerpt: String,
  pub body: String,
  /// Internal category key, see `category` for display labels.
  pub category: String,
  pub author: String,
  pub featured: bool,
  pub slug: String,
  pub published_at: DateTime<Utc>,
  pub image_url: Option<String>,
  /// Gallery image URLs, in display order.
  pub gallery: Vec<String>,
  pub video_url: Option<String>,
  pub tags: Vec<String>,
  /// Manual rank for drag-drop ordering; absent until an editor reorders.
  pub sort_order: Option<i64>,
}

/// Fields for creating an article. Identity and publication time are
/// assigned by the data manager; the slug is derived from the title when
/// not supplied.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
  pub title: String,
  pub excerpt: String,
  pub body: String,
  pub category: String,
  pub author: String,
  pub featured: bool,
  pub slug: Option<String>,
  /// Override for backdated imports; defaults to "now".
  pub published_at: Option<DateTime<Utc>>,
  pub image_url: Option<String>,
  pub gallery: Vec<String>,
  pub video_url: Option<String>,
  pub tags: Vec<String>,
}

/// Partial update for an article. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
  pub title: Option<String>,
  pub excerpt: Option<String>,
  pub body: Option<String>,
  pub category: Option<String>,
  pub author: Option<String>,
  pub featured: Option<bool>,
  pub slug: Option<String>,
  pub image_url: Option<String>,
  pub gallery: Option<Vec<String>>,
  pub video_url: Option<String>,
  pub tags: Option<Vec<String>>,
  pub sort_order: Option<i64>,
}

// ============================================================================
// Players
// ============================================================================

/// Squad position. Wire data is loose, so unknown values are preserved
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
  Goalkeeper,
  Defender,
  Midfielder,
  Forward,
  Other(String),
}

impl Position {
  /// Parse a wire value, accepting the Spanish labels the admin forms
  /// historically stored alongside the canonical keys.
  pub fn parse(value: &str) -> Self {
    match value.trim().to_lowercase().as_str() {
      "goalkeeper" | "arquero" | "portero" => Self::Goalkeeper,
      "defender" | "defensor" => Self::Defender,
      "midfielder" | "mediocampista" | "volante" => Self::Midfielder,
      "forward" | "delantero" => Self::Forward,
      _ => Self::Other(value.trim().to_string()),
    }
  }

  /// Canonical key as stored in the remote table.
  pub fn as_key(&self) -> &str {
    match self {
      Self::Goalkeeper => "goalkeeper",
      Self::Defender => "defender",
      Self::Midfielder => "midfielder",
      Self::Forward => "forward",
      Self::Other(raw) => raw,
    }
  }

  /// Spanish display label.
  pub fn label(&self) -> &str {
    match self {
      Self::Goalkeeper => "Arquero",
      Self::Defender => "Defensor",
      Self::Midfielder => "Mediocampista",
      Self::Forward => "Delantero",
      Self::Other(raw) => raw,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
  pub id: String,
  pub name: String,
  pub position: Position,
  pub number: u32,
  /// Whole years; recomputed from `birth_date` whenever it is present.
  pub age: i32,
  pub birth_date: Option<NaiveDate>,
  pub nationality: String,
  pub height: Option<String>,
  pub weight: Option<String>,
  pub matches: Option<u32>,
  pub goals: Option<u32>,
  pub assists: Option<u32>,
  pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
  pub name: String,
  pub position: Position,
  pub number: u32,
  /// Used only when `birth_date` is absent.
  pub age: Option<i32>,
  pub birth_date: Option<NaiveDate>,
  pub nationality: String,
  pub height: Option<String>,
  pub weight: Option<String>,
  pub matches: Option<u32>,
  pub goals: Option<u32>,
  pub assists: Option<u32>,
  pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
  pub name: Option<String>,
  pub position: Option<Position>,
  pub number: Option<u32>,
  pub age: Option<i32>,
  pub birth_date: Option<NaiveDate>,
  pub nationality: Option<String>,
  pub height: Option<String>,
  pub weight: Option<String>,
  pub matches: Option<u32>,
  pub goals: Option<u32>,
  pub assists: Option<u32>,
  pub photo_url: Option<String>,
}

/// Whole years between `birth` and `today`, decremented when today's
/// month/day precede the birth month/day.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
  let mut age = today.year() - birth.year();
  if (today.month(), today.day()) < (birth.month(), birth.day()) {
    age -= 1;
  }
  age
}

// ============================================================================
// Staff
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
  pub id: String,
  pub name: String,
  pub role: String,
  pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStaffMember {
  pub name: String,
  pub role: String,
  pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StaffPatch {
  pub name: Option<String>,
  pub role: Option<String>,
  pub photo_url: Option<String>,
}

// ============================================================================
// Matches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
  Upcoming,
  Live,
  Finished,
  /// Declared in the data shape but no editor flow sets it yet; accepted
  /// on the wire and preserved.
  Postponed,
}

impl MatchStatus {
  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_lowercase().as_str() {
      "upcoming" => Some(Self::Upcoming),
      "live" => Some(Self::Live),
      "finished" => Some(Self::Finished),
      "postponed" => Some(Self::Postponed),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Upcoming => "upcoming",
      Self::Live => "live",
      Self::Finished => "finished",
      Self::Postponed => "postponed",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
  pub id: String,
  pub home: String,
  pub away: String,
  /// Present only once the match concludes. Not enforced against `status`.
  pub home_score: Option<i32>,
  pub away_score: Option<i32>,
  pub kickoff: DateTime<FixedOffset>,
  pub tournament: String,
  pub venue: String,
  pub status: MatchStatus,
  pub home_logo: Option<String>,
  pub away_logo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMatch {
  pub home: String,
  pub away: String,
  pub home_score: Option<i32>,
  pub away_score: Option<i32>,
  /// Civil kickoff time as entered in the admin form.
  pub kickoff_local: NaiveDateTime,
  pub tournament: String,
  pub venue: String,
  pub status: MatchStatus,
  pub home_logo: Option<String>,
  pub away_logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchPatch {
  pub home: Option<String>,
  pub away: Option<String>,
  pub home_score: Option<i32>,
  pub away_score: Option<i32>,
  pub kickoff_local: Option<NaiveDateTime>,
  pub tournament: Option<String>,
  pub venue: Option<String>,
  pub status: Option<MatchStatus>,
  pub home_logo: Option<String>,
  pub away_logo: Option<String>,
}

/// The club's civil-time offset (UTC-3). Match times are stored with this
/// fixed offset rather than converted to true UTC.
pub fn club_offset() -> FixedOffset {
  // Valid by construction, 3 hours is well inside the accepted range.
  FixedOffset::west_opt(3 * 3600).expect("static UTC offset")
}

/// Attach the club offset to a civil date-time from the admin form.
pub fn kickoff_from_local(local: NaiveDateTime) -> DateTime<FixedOffset> {
  match local.and_local_timezone(club_offset()).single() {
    Some(kickoff) => kickoff,
    // Fixed offsets never yield ambiguous local times.
    None => club_offset().from_utc_datetime(&local),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn age_day_before_birthday() {
    let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    assert_eq!(age_on(birth, today), 23);
  }

  #[test]
  fn age_on_birthday_and_after() {
    let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
    assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 24);
    assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2024, 11, 2).unwrap()), 24);
  }

  #[test]
  fn age_leap_day_birth() {
    let birth = NaiveDate::from_ymd_opt(2004, 2, 29).unwrap();
    assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()), 18);
    assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()), 19);
  }

  #[test]
  fn position_accepts_spanish_labels() {
    assert_eq!(Position::parse("Arquero"), Position::Goalkeeper);
    assert_eq!(Position::parse("delantero"), Position::Forward);
    assert_eq!(Position::parse("midfielder"), Position::Midfielder);
    assert_eq!(
      Position::parse("lateral"),
      Position::Other("lateral".to_string())
    );
  }

  #[test]
  fn match_status_round_trips() {
    for status in [
      MatchStatus::Upcoming,
      MatchStatus::Live,
      MatchStatus::Finished,
      MatchStatus::Postponed,
    ] {
      assert_eq!(MatchStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(MatchStatus::parse("suspendido"), None);
  }

  #[test]
  fn kickoff_keeps_civil_offset() {
    let local = NaiveDate::from_ymd_opt(2025, 3, 9)
      .unwrap()
      .and_hms_opt(21, 30, 0)
      .unwrap();
    let kickoff = kickoff_from_local(local);
    assert_eq!(kickoff.to_rfc3339(), "2025-03-09T21:30:00-03:00");
  }
}
