use std::sync::Arc;

use anyhow::Context;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::db;
use crate::store::{MemoryStore, SharedStore, SqliteStore};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: Backend,
    pub database_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Sqlite,
}

impl Settings {
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.database_path", "quiz.db")
    }

    /// Defaults, then an optional `quiz.{toml,yaml,json}` file, then `QUIZ__*` variables
    /// (after `.env` has been loaded into the environment).
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::defaults()?
            .add_source(File::with_name("quiz").required(false))
            .add_source(
                Environment::with_prefix("QUIZ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageSettings {
    pub async fn open(&self) -> anyhow::Result<SharedStore> {
        match self.backend {
            Backend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Arc::new(MemoryStore::new()))
            }
            Backend::Sqlite => {
                tracing::info!("Using sqlite storage at {}", self.database_path);
                let pool = db::establish_connection(&self.database_path)
                    .await
                    .context("Cannot connect to DB")?;
                tracing::info!("Running db migrations...");
                db::run_migrations(&pool)
                    .await
                    .context("Failed to run migrations")?;
                Ok(Arc::new(SqliteStore::new(pool)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.server.address(), "0.0.0.0:3000");
        assert_eq!(settings.storage.backend, Backend::Memory);
        assert_eq!(settings.storage.database_path, "quiz.db");
    }

    #[test]
    fn backend_can_be_overridden() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .set_override("storage.backend", "sqlite")
            .unwrap()
            .set_override("server.port", 8080_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.storage.backend, Backend::Sqlite);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let settings = Settings::defaults()
            .unwrap()
            .set_override("storage.backend", "postgres")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<Settings>();
        assert!(settings.is_err());
    }

    #[tokio::test]
    async fn sqlite_backend_opens_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageSettings {
            backend: Backend::Sqlite,
            database_path: dir.path().join("quiz.db").display().to_string(),
        };
        let store = storage.open().await.unwrap();
        assert!(store.get_quiz("missing").await.is_err());
    }
}
