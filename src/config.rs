use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub store: StoreConfig,
  /// Custom site title for admin output (defaults to the store host).
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Base URL of the hosted store, e.g. https://xyz.supabase.co
  pub url: String,
  /// Bucket for uploaded media.
  #[serde(default = "default_bucket")]
  pub bucket: String,
}

fn default_bucket() -> String {
  "images".to_string()
}

impl Config {
  /// Load the config from an explicit path, or from the usual places:
  /// `./tribuna.yaml` first, then `$XDG_CONFIG_HOME/tribuna/config.yaml`.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      if !path.exists() {
        return Err(eyre!("config file not found: {}", path.display()));
      }
      return Self::read(path);
    }

    match Self::search_paths().into_iter().find(|p| p.exists()) {
      Some(path) => Self::read(&path),
      None => Err(eyre!(
        "no config found; create ~/.config/tribuna/config.yaml with the store url"
      )),
    }
  }

  fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("tribuna.yaml")];
    if let Some(dir) = dirs::config_dir() {
      paths.push(dir.join("tribuna").join("config.yaml"));
    }
    paths
  }

  fn read(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path)
      .map_err(|e| eyre!("could not read {}: {}", path.display(), e))?;
    serde_yaml::from_str(&text).map_err(|e| eyre!("could not parse {}: {}", path.display(), e))
  }

  /// The store API key lives in the environment, never in the config file:
  /// `TRIBUNA_STORE_KEY`, with `SUPABASE_ANON_KEY` accepted as a fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("TRIBUNA_STORE_KEY")
      .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
      .map_err(|_| eyre!("set TRIBUNA_STORE_KEY (or SUPABASE_ANON_KEY) to the store API key"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_minimal_config() {
    let config: Config =
      serde_yaml::from_str("store:\n  url: https://xyz.supabase.co\ntitle: Club Atlético\n")
        .unwrap();
    assert_eq!(config.store.url, "https://xyz.supabase.co");
    assert_eq!(config.store.bucket, "images");
    assert_eq!(config.title.as_deref(), Some("Club Atlético"));
  }

  #[test]
  fn explicit_missing_path_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/tribuna.yaml"))).unwrap_err();
    assert!(err.to_string().contains("not found"));
  }
}
