//! Data layer for a football club website: a cached CRUD façade over a
//! hosted table store, plus the derived-value rules the site relies on
//! (slugs, ages, category labels, the featured-article cap) and a small
//! media-upload client.

pub mod cache;
pub mod club;
pub mod config;
pub mod error;
pub mod media;
pub mod store;
