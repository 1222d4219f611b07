//! Application-level configuration: the JSON settings file and the storage backend selection.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FIND_NUMBERS_BACK_CONFIG_PATH";
/// Number of entries served on a leaderboard when the config does not say otherwise.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    leaderboard_limit: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        leaderboard_limit = app_config.leaderboard_limit,
                        "loaded configuration"
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

    /// Parse a configuration document. Missing keys take their default value.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Maximum number of players listed on a leaderboard.
    pub fn leaderboard_limit(&self) -> usize {
        self.leaderboard_limit
    }

    /// Override the leaderboard size.
    pub fn with_leaderboard_limit(mut self, limit: usize) -> Self {
        self.leaderboard_limit = limit.max(1);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    leaderboard_limit: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        match value.leaderboard_limit {
            Some(limit) => defaults.with_leaderboard_limit(limit),
            None => defaults,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Raised when the storage environment variables are inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageSettingsError {
    /// `STORAGE_BACKEND` names a backend this binary does not know.
    #[error("unknown storage backend `{0}` (expected memory, mongo or postgrest)")]
    UnknownBackend(String),
    /// A variable required by the selected backend is missing.
    #[error("missing environment variable `{var}` for the {backend} backend")]
    MissingEnvVar {
        var: &'static str,
        backend: &'static str,
    },
}

/// Which ranking store the server connects to, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSettings {
    /// Keep rankings in process memory (lost on restart).
    Memory,
    /// MongoDB collection `rankings`.
    Mongo {
        uri: String,
        database: Option<String>,
    },
    /// PostgREST / Supabase REST table.
    Postgrest {
        base_url: String,
        table: String,
        api_key: Option<String>,
    },
}

impl StorageSettings {
    /// Short name of the backend, as accepted by `STORAGE_BACKEND`.
    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageSettings::Memory => "memory",
            StorageSettings::Mongo { .. } => "mongo",
            StorageSettings::Postgrest { .. } => "postgrest",
        }
    }

    /// Whether the cargo feature providing this backend was enabled.
    pub fn is_compiled_in(&self) -> bool {
        match self {
            StorageSettings::Memory => true,
            StorageSettings::Mongo { .. } => cfg!(feature = "mongo-store"),
            StorageSettings::Postgrest { .. } => cfg!(feature = "postgrest-store"),
        }
    }

    /// Read `STORAGE_BACKEND` and the variables of the selected backend.
    pub fn from_env() -> Result<Self, StorageSettingsError> {
        Self::from_lookup(|key| env::var(key).ok().filter(|value| !value.is_empty()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StorageSettingsError> {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "memory".into());

        match backend.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageSettings::Memory),
            "mongo" | "mongodb" => Ok(StorageSettings::Mongo {
                uri: lookup("MONGO_URI").unwrap_or_else(|| "mongodb://localhost:27017".into()),
                database: lookup("MONGO_DB"),
            }),
            "postgrest" | "supabase" => {
                let base_url =
                    lookup("POSTGREST_URL").ok_or(StorageSettingsError::MissingEnvVar {
                        var: "POSTGREST_URL",
                        backend: "postgrest",
                    })?;
                Ok(StorageSettings::Postgrest {
                    base_url,
                    table: lookup("POSTGREST_TABLE").unwrap_or_else(|| "rankings".into()),
                    api_key: lookup("POSTGREST_API_KEY"),
                })
            }
            _ => Err(StorageSettingsError::UnknownBackend(backend)),
        }
    }
}
