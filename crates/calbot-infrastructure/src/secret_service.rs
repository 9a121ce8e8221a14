//! Secret service implementation.
//!
//! Reads secret.json and fills whatever it leaves out from environment
//! variables (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`, `OPENAI_BASE_URL`,
//! `CAL_API_KEY`, `CAL_BASE_URL`).

use crate::storage::{SecretStorage, SecretStorageError};
use anyhow::Result;
use calbot_core::config::{CalConfig, OpenAiConfig, SecretConfig};
use calbot_core::secret::SecretService;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// File-then-environment secret loading with an in-memory cache.
#[derive(Clone)]
pub struct SecretServiceImpl {
    storage: Arc<SecretStorage>,
    env: EnvLookup,
    /// Filled on first successful load.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Uses the default secret.json location and the process environment.
    pub fn new() -> Result<Self> {
        let storage = SecretStorage::new()
            .map_err(|e| anyhow::anyhow!("Failed to resolve secret path: {}", e))?;
        Ok(Self::from_parts(storage, Arc::new(process_env)))
    }

    /// Uses a custom secret.json path and the process environment.
    pub fn with_path(path: PathBuf) -> Self {
        Self::from_parts(SecretStorage::with_path(path), Arc::new(process_env))
    }

    /// Replaces the environment lookup.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    fn from_parts(storage: SecretStorage, env: EnvLookup) -> Self {
        Self {
            storage: Arc::new(storage),
            env,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        if let Ok(cached) = self.secrets.read() {
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let from_file = match self.storage.load() {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(path)) => {
                tracing::debug!("No secret file at {:?}, relying on environment", path);
                SecretConfig::default()
            }
            Err(e) => return Err(format!("Failed to load secrets: {}", e)),
        };

        let merged = self.fill_from_env(from_file);

        if let Ok(mut cache) = self.secrets.write() {
            *cache = Some(merged.clone());
        }
        Ok(merged)
    }

    fn fill_from_env(&self, mut config: SecretConfig) -> SecretConfig {
        let env = |key: &str| (self.env)(key).filter(|v| !v.trim().is_empty());

        match config.openai.as_mut() {
            Some(openai) => {
                if openai.model_name.is_none() {
                    openai.model_name = env("OPENAI_MODEL_NAME");
                }
                if openai.base_url.is_none() {
                    openai.base_url = env("OPENAI_BASE_URL");
                }
            }
            None => {
                config.openai = env("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
                    api_key,
                    model_name: env("OPENAI_MODEL_NAME"),
                    base_url: env("OPENAI_BASE_URL"),
                });
            }
        }

        match config.cal.as_mut() {
            Some(cal) => {
                if cal.base_url.is_none() {
                    cal.base_url = env("CAL_BASE_URL");
                }
            }
            None => {
                config.cal = env("CAL_API_KEY").map(|api_key| CalConfig {
                    api_key,
                    base_url: env("CAL_BASE_URL"),
                });
            }
        }

        config
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.storage.path().exists()
    }
}
