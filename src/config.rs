//! Application-level configuration loading: storage backend choice, listen port and
//! leaderboard sizes.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dto::score::MAX_QUERY_LIMIT;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DUUM_BACK_CONFIG_PATH";
const DEFAULT_PORT: u16 = 5054;
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
/// Number of scores returned by `GET /api/scores` when no limit is given.
pub const DEFAULT_SCORES_LIMIT: usize = 10;
/// Number of scores per mode returned by `GET /api/leaderboard` when no limit is given.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 20;

/// Which persistence backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local tables, lost on restart.
    #[default]
    Memory,
    /// MongoDB collections (requires the `mongo-store` feature).
    Mongo,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "mongo" | "mongodb" => Some(Self::Mongo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Backend installed by the storage supervisor.
    pub storage: StorageBackend,
    /// Connection string used when `storage` is [`StorageBackend::Mongo`].
    pub mongo_uri: String,
    /// Database name; the MongoDB backend picks its own default when unset.
    pub mongo_db: Option<String>,
    /// Default size of `GET /api/scores`.
    pub scores_limit: usize,
    /// Default size of each mode in `GET /api/leaderboard`.
    pub leaderboard_limit: usize,
}

impl AppConfig {
    /// Load the configuration file (if any) and apply environment overrides on top.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_env();
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        storage = ?app_config.storage,
                        "loaded config file"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn apply_env(&mut self) {
        if let Some(port) = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
        {
            self.port = port;
        }

        if let Ok(value) = env::var("STORAGE") {
            match StorageBackend::parse(&value) {
                Some(storage) => self.storage = storage,
                None => warn!(value = %value, "unknown STORAGE value; keeping configured backend"),
            }
        }

        if let Ok(uri) = env::var("MONGO_URI") {
            self.mongo_uri = uri;
        }
        if let Ok(db) = env::var("MONGO_DB") {
            self.mongo_db = Some(db);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            storage: StorageBackend::default(),
            mongo_uri: DEFAULT_MONGO_URI.to_owned(),
            mongo_db: None,
            scores_limit: DEFAULT_SCORES_LIMIT,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    storage: Option<StorageBackend>,
    #[serde(default)]
    mongo_uri: Option<String>,
    #[serde(default)]
    mongo_db: Option<String>,
    #[serde(default)]
    scores_limit: Option<usize>,
    #[serde(default)]
    leaderboard_limit: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            port: value.port.unwrap_or(defaults.port),
            storage: value.storage.unwrap_or(defaults.storage),
            mongo_uri: value.mongo_uri.unwrap_or(defaults.mongo_uri),
            mongo_db: value.mongo_db.or(defaults.mongo_db),
            scores_limit: value
                .scores_limit
                .map_or(defaults.scores_limit, |limit| {
                    checked_limit("scores_limit", limit, defaults.scores_limit)
                }),
            leaderboard_limit: value
                .leaderboard_limit
                .map_or(defaults.leaderboard_limit, |limit| {
                    checked_limit("leaderboard_limit", limit, defaults.leaderboard_limit)
                }),
        }
    }
}

/// Keep a configured list size within what queries accept: zero falls back to the default,
/// anything above [`MAX_QUERY_LIMIT`] is capped.
fn checked_limit(key: &'static str, limit: usize, default: usize) -> usize {
    match limit {
        0 => {
            warn!(key, default, "configured limit is zero; using default");
            default
        }
        limit if limit > MAX_QUERY_LIMIT => {
            warn!(key, limit, max = MAX_QUERY_LIMIT, "configured limit too large; capping");
            MAX_QUERY_LIMIT
        }
        limit => limit,
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
