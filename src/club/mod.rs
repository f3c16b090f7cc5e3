//! Club domain: entities, derived values, and the cached data manager.

pub mod category;
mod manager;
mod rows;
mod slug;
mod types;

pub use manager::DataManager;
pub use slug::slugify;
pub use types::{
  age_on, club_offset, kickoff_from_local, Article, ArticlePatch, Match, MatchPatch, MatchStatus, NewArticle, NewMatch, NewPlayer,
  NewStaffMember, Player, PlayerPatch, Position, StaffMember, StaffPatch, MAX_FEATURED,
};
