use serde::{Deserialize, Serialize};

use crate::user::DEFAULT_TIMEZONE;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CAL_BASE_URL: &str = "https://api.cal.com/v2";

// ============================================================================
// Secrets (secret.json)
// ============================================================================

/// Root configuration structure for secret.json
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cal: Option<CalConfig>,
}

/// OpenAI-compatible chat completion API configuration
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Override for proxies or compatible endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAiConfig {
    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }
}

/// Cal.com API configuration
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CalConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl CalConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_CAL_BASE_URL)
    }
}

// ============================================================================
// Application settings (config.toml)
// ============================================================================

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

/// HTTP adapter settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Conversation behaviour settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Timezone assumed until the user's own is known.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Debug settings
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DebugSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.assistant.default_timezone, "America/Los_Angeles");
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_secret_defaults() {
        let secrets: SecretConfig = serde_json::from_str(
            r#"{ "openai": { "api_key": "sk-test" }, "cal": { "api_key": "cal_test" } }"#,
        )
        .unwrap();
        let openai = secrets.openai.unwrap();
        assert_eq!(openai.model(), "gpt-4o");
        assert_eq!(openai.base_url(), "https://api.openai.com/v1");
        assert_eq!(secrets.cal.unwrap().base_url(), "https://api.cal.com/v2");
    }
}
