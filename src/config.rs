use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_FILMS_URL: &str = "https://star-wars-api.herokuapp.com/films";
pub const DEFAULT_RATINGS_URL: &str = "https://www.omdbapi.com/";

/// Environment override for the ratings API key; takes precedence over
/// config.json so the credential never has to live in a checked-in file.
pub const OMDB_API_KEY_ENV: &str = "SWEX_OMDB_API_KEY";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub films_url: String,
    pub ratings_url: String,
    pub omdb_api_key: Option<String>,
    pub cache_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            films_url: DEFAULT_FILMS_URL.to_string(),
            ratings_url: DEFAULT_RATINGS_URL.to_string(),
            omdb_api_key: None,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    films_url: Option<String>,
    ratings_url: Option<String>,
    omdb_api_key: Option<String>,
    cache_dir: Option<String>,
}

fn merge_raw(cfg: &mut AppConfig, parsed: RawConfig) {
    if let Some(url) = parsed.films_url {
        cfg.films_url = url;
    }
    if let Some(url) = parsed.ratings_url {
        cfg.ratings_url = url;
    }
    if parsed.omdb_api_key.is_some() {
        cfg.omdb_api_key = parsed.omdb_api_key;
    }
    if parsed.cache_dir.is_some() {
        cfg.cache_dir = parsed.cache_dir;
    }
}

fn apply_env_key(cfg: &mut AppConfig, env_key: Option<String>) {
    if let Some(key) = env_key {
        if !key.trim().is_empty() {
            cfg.omdb_api_key = Some(key);
        }
    }
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from("config.json");
    let mut cfg = AppConfig::default();

    match fs::read_to_string(&cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                merge_raw(&mut cfg, parsed);
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
        }
    }

    apply_env_key(&mut cfg, env::var(OMDB_API_KEY_ENV).ok());

    if cfg.omdb_api_key.is_none() {
        warn!(
            "No ratings API key set ({OMDB_API_KEY_ENV} or omdb_api_key in config.json); \
             rating enrichment will be skipped."
        );
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.films_url, DEFAULT_FILMS_URL);
        assert_eq!(cfg.ratings_url, DEFAULT_RATINGS_URL);
        assert!(cfg.omdb_api_key.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut cfg = AppConfig::default();
        let parsed: RawConfig = serde_json::from_str(
            r#"{"films_url":"http://localhost:9000/films","omdb_api_key":"abc123"}"#,
        )
        .unwrap();
        merge_raw(&mut cfg, parsed);
        assert_eq!(cfg.films_url, "http://localhost:9000/films");
        assert_eq!(cfg.ratings_url, DEFAULT_RATINGS_URL);
        assert_eq!(cfg.omdb_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn env_key_wins_over_file_key() {
        let mut cfg = AppConfig::default();
        cfg.omdb_api_key = Some("from-file".into());
        apply_env_key(&mut cfg, Some("from-env".into()));
        assert_eq!(cfg.omdb_api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.omdb_api_key = Some("from-file".into());
        apply_env_key(&mut cfg, Some("   ".into()));
        assert_eq!(cfg.omdb_api_key.as_deref(), Some("from-file"));
    }
}
