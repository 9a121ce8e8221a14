//! Wiring shared by every subcommand: configuration, logging and the
//! session store.

use std::sync::Arc;

use anyhow::{Context, Result};
use calbot_application::{SessionFactory, SessionStore};
use calbot_core::config::{AppConfig, ServerSettings};
use calbot_core::secret::SecretService;
use calbot_infrastructure::{CalApiClient, ConfigStorage, SecretServiceImpl};
use calbot_interaction::{OpenAiApiAgent, ToolRegistry};
use tracing_subscriber::EnvFilter;

/// Loads `config.toml`, falling back to defaults when it does not exist.
pub fn load_config() -> Result<AppConfig> {
    let storage = ConfigStorage::new().context("Failed to locate config directory")?;
    storage
        .load()
        .with_context(|| format!("Failed to load {}", storage.path().display()))
}

/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = init_result {
        eprintln!("tracing already initialized: {err}");
    }
}

/// Builds the session store from secrets and settings.
pub async fn build_session_store(config: &AppConfig) -> Result<SessionStore> {
    let service = SecretServiceImpl::new()?;
    if !service.secret_file_exists().await {
        tracing::info!("No secret.json found, reading API keys from the environment");
    }
    let secrets = service.load_secrets().await.map_err(anyhow::Error::msg)?;

    let openai = secrets.openai.context(
        "OpenAI API key is not configured: set OPENAI_API_KEY or add \"openai\" to secret.json",
    )?;
    let cal = secrets.cal.context(
        "Cal.com API key is not configured: set CAL_API_KEY or add \"cal\" to secret.json",
    )?;

    tracing::debug!(
        model = openai.model(),
        cal_base_url = cal.base_url(),
        "Configured providers"
    );

    let provider = Arc::new(OpenAiApiAgent::from_config(&openai));
    let tools = Arc::new(ToolRegistry::new(Arc::new(CalApiClient::from_config(&cal))));
    let factory = SessionFactory::new(provider, tools, config.assistant.default_timezone.clone());

    Ok(SessionStore::new(factory))
}

/// Resolves the HTTP bind address: CLI flag, then `HOST`/`PORT`, then
/// `config.toml`.
pub fn bind_address<F>(
    server: &ServerSettings,
    host: Option<String>,
    port: Option<u16>,
    env: F,
) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let host = host
        .or_else(|| non_blank("HOST"))
        .unwrap_or_else(|| server.host.clone());

    let port = match port {
        Some(port) => port,
        None => match non_blank("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            None => server.port,
        },
    };

    Ok(format!("{host}:{port}"))
}
