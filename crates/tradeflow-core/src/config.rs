//! Project configuration.
//!
//! Read from `<project>/.tradeflow/config.toml` when present, then overridden
//! by `TRADEFLOW_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::{TradeflowError, TradeflowResult};
use tradeflow_store::BackendKind;

pub const CONFIG_DIR: &str = ".tradeflow";
pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_DB_PATH: &str = ".tradeflow/store.db";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_WEB_URL: &str = "http://127.0.0.1:3040";

/// Which store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSetting {
    Memory,
    #[default]
    Sqlite,
    Redis,
}

impl FromStr for BackendSetting {
    type Err = TradeflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "redis" => Ok(Self::Redis),
            other => Err(TradeflowError::Config(format!(
                "Unknown backend '{}' (expected memory, sqlite or redis)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendSetting,
    /// SQLite file, relative to the project directory unless absolute.
    pub db_path: PathBuf,
    pub redis_url: String,
    /// Where `tradeflow serve` listens, used to forward CLI events.
    pub web_url: String,
    /// Simulated processing delay per workflow action.
    pub latency_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendSetting::default(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            latency_ms: 0,
        }
    }
}

impl Config {
    /// Load config for a project directory, applying environment overrides.
    pub fn load(project_dir: &Path) -> TradeflowResult<Self> {
        let path = project_dir.join(CONFIG_DIR).join(CONFIG_FILE);
        let mut config = if path.exists() {
            debug!(path = %path.display(), "Reading config file");
            let text = std::fs::read_to_string(&path)?;
            Self::parse(&text)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn parse(text: &str) -> TradeflowResult<Self> {
        toml::from_str(text).map_err(|e| TradeflowError::Config(e.to_string()))
    }

    /// Apply `TRADEFLOW_*` overrides from a variable lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> TradeflowResult<()> {
        if let Some(backend) = lookup("TRADEFLOW_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(db) = lookup("TRADEFLOW_DB") {
            self.db_path = PathBuf::from(db);
        }
        if let Some(url) = lookup("REDIS_URL") {
            self.redis_url = url;
        }
        if let Some(url) = lookup("TRADEFLOW_WEB_URL") {
            self.web_url = url;
        }
        if let Some(ms) = lookup("TRADEFLOW_LATENCY_MS") {
            self.latency_ms = ms.trim().parse().map_err(|_| {
                TradeflowError::Config(format!("TRADEFLOW_LATENCY_MS must be a number, got '{}'", ms))
            })?;
        }
        Ok(())
    }

    /// Resolve the backend to open for a project directory.
    pub fn backend_kind(&self, project_dir: &Path) -> BackendKind {
        match self.backend {
            BackendSetting::Memory => BackendKind::Memory,
            BackendSetting::Redis => BackendKind::Redis(self.redis_url.clone()),
            BackendSetting::Sqlite => {
                if self.db_path.is_absolute() {
                    BackendKind::Sqlite(self.db_path.clone())
                } else {
                    BackendKind::Sqlite(project_dir.join(&self.db_path))
                }
            }
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, BackendSetting::Sqlite);
        assert_eq!(
            config.backend_kind(Path::new("/work")),
            BackendKind::Sqlite(PathBuf::from("/work/.tradeflow/store.db"))
        );
        assert_eq!(config.latency(), Duration::ZERO);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse("backend = \"redis\"\nlatency_ms = 250\n").unwrap();
        assert_eq!(config.backend, BackendSetting::Redis);
        assert_eq!(config.latency_ms, 250);
        assert_eq!(config.web_url, DEFAULT_WEB_URL);
        assert!(Config::parse("backend = \"mongo\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TRADEFLOW_BACKEND", "memory"),
            ("TRADEFLOW_WEB_URL", "http://localhost:9000"),
            ("TRADEFLOW_LATENCY_MS", "40"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.backend_kind(Path::new(".")), BackendKind::Memory);
        assert_eq!(config.web_url, "http://localhost:9000");
        assert_eq!(config.latency(), Duration::from_millis(40));

        let mut config = Config::default();
        let err = config.apply_env(|key| (key == "TRADEFLOW_LATENCY_MS").then(|| "soon".to_string()));
        assert!(matches!(err, Err(TradeflowError::Config(_))));
    }
}
