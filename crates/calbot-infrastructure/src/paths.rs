//! Unified path management for calbot configuration files.
//!
//! ```text
//! ~/.config/calbot/
//! ├── config.toml    # Application configuration
//! └── secret.json    # API keys
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "calbot";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for calbot.
pub struct CalbotPaths;

impl CalbotPaths {
    /// Returns the calbot configuration directory (`~/.config/calbot/`).
    ///
    /// `$XDG_CONFIG_HOME` is honoured when set; otherwise the directory lives
    /// under `~/.config` on every platform.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(xdg).join(APP_DIR));
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join(APP_DIR))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_in_config_dir() {
        let dir = CalbotPaths::config_dir().unwrap();
        assert!(dir.ends_with("calbot"));
        assert_eq!(CalbotPaths::config_file().unwrap(), dir.join("config.toml"));
        assert_eq!(CalbotPaths::secret_file().unwrap(), dir.join("secret.json"));
    }
}
