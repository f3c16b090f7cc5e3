//! Object-storage uploads for article and roster media.
//!
//! The store's object API is simple: post bytes under a generated name in a
//! bucket, then serve them from a public URL. Validation (type and size)
//! happens here so the admin surface gets a typed error instead of a raw
//! storage rejection.

use chrono::Utc;
use thiserror::Error;
use url::Url;

/// Content types the site accepts.
const ALLOWED_TYPES: &[(&str, MediaKind)] = &[
  ("image/jpeg", MediaKind::Image),
  ("image/jpg", MediaKind::Image),
  ("image/png", MediaKind::Image),
  ("image/webp", MediaKind::Image),
  ("video/mp4", MediaKind::Video),
  ("video/webm", MediaKind::Video),
  ("video/ogg", MediaKind::Video),
];

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const MAX_VIDEO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
  Image,
  Video,
}

impl MediaKind {
  fn size_limit(self) -> usize {
    match self {
      Self::Image => MAX_IMAGE_BYTES,
      Self::Video => MAX_VIDEO_BYTES,
    }
  }
}

/// A successfully stored object.
#[derive(Debug, Clone)]
pub struct Upload {
  /// Public URL to embed in article/roster records.
  pub url: String,
  pub object_name: String,
  pub kind: MediaKind,
}

#[derive(Debug, Error)]
pub enum UploadError {
  #[error("unsupported content type: {0}")]
  UnsupportedType(String),

  #[error("file too large: {size} bytes (limit {limit})")]
  TooLarge { size: usize, limit: usize },

  #[error("transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("storage returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("invalid storage url: {0}")]
  BadUrl(String),
}

#[derive(Clone)]
pub struct MediaClient {
  http: reqwest::Client,
  base: Url,
  bucket: String,
  api_key: String,
}

impl MediaClient {
  pub fn new(base_url: &str, bucket: &str, api_key: String) -> Result<Self, UploadError> {
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };
    let base = Url::parse(&normalized).map_err(|e| UploadError::BadUrl(e.to_string()))?;

    Ok(Self {
      http: reqwest::Client::new(),
      base,
      bucket: bucket.to_string(),
      api_key,
    })
  }

  /// Validate and upload a file, returning its public URL. The object name
  /// is a millisecond timestamp plus the original extension so repeated
  /// uploads never collide on the happy path.
  pub async fn upload(
    &self,
    original_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
  ) -> Result<Upload, UploadError> {
    let kind = validate(content_type, bytes.len())?;

    let extension = original_name.rsplit('.').next().unwrap_or("bin");
    let object_name = format!("{}.{}", Utc::now().timestamp_millis(), extension);

    let url = self
      .base
      .join(&format!("storage/v1/object/{}/{}", self.bucket, object_name))
      .map_err(|e| UploadError::BadUrl(e.to_string()))?;

    let response = self
      .http
      .post(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .header("Content-Type", content_type)
      .header("Cache-Control", "max-age=3600")
      .body(bytes)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(UploadError::Status {
        status: status.as_u16(),
        body,
      });
    }

    let public = self
      .base
      .join(&format!(
        "storage/v1/object/public/{}/{}",
        self.bucket, object_name
      ))
      .map_err(|e| UploadError::BadUrl(e.to_string()))?;

    Ok(Upload {
      url: public.to_string(),
      object_name,
      kind,
    })
  }
}

/// Check a candidate upload against the allowed types and size caps.
fn validate(content_type: &str, size: usize) -> Result<MediaKind, UploadError> {
  let kind = ALLOWED_TYPES
    .iter()
    .find(|(candidate, _)| *candidate == content_type)
    .map(|(_, kind)| *kind)
    .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;

  let limit = kind.size_limit();
  if size > limit {
    return Err(UploadError::TooLarge { size, limit });
  }
  Ok(kind)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_unsupported_type() {
    let err = validate("application/pdf", 16).unwrap_err();
    assert!(matches!(err, UploadError::UnsupportedType(_)));
  }

  #[test]
  fn rejects_oversized_image() {
    let err = validate("image/png", MAX_IMAGE_BYTES + 1).unwrap_err();
    assert!(matches!(
      err,
      UploadError::TooLarge {
        limit: MAX_IMAGE_BYTES,
        ..
      }
    ));
  }

  #[test]
  fn videos_get_the_larger_limit() {
    assert_eq!(
      validate("video/mp4", MAX_IMAGE_BYTES + 1).unwrap(),
      MediaKind::Video
    );
    assert!(validate("video/mp4", MAX_VIDEO_BYTES + 1).is_err());
  }

  #[test]
  fn public_url_shape() {
    let client =
      MediaClient::new("https://example.supabase.co", "images", "key".into()).unwrap();
    let url = client
      .base
      .join("storage/v1/object/public/images/123.png")
      .unwrap();
    assert_eq!(
      url.as_str(),
      "https://example.supabase.co/storage/v1/object/public/images/123.png"
    );
  }
}
