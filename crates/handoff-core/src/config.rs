use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HandoffError, Result};

/// Top-level configuration shared by the agent and application sides.
///
/// Loaded from `~/.handoff/config.toml` by default. Both processes must agree
/// on `general.data_dir` and `store.file_name`, since that is where the shared
/// store lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandoffConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl HandoffConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HandoffConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HandoffError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the shared store database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.handoff/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Shared action store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file name inside `general.data_dir`.
    pub file_name: String,
    /// How long a connection waits on a lock held by the other process.
    pub busy_timeout_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_name: "handoff.db".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

/// Which lifecycle events trigger a pending-action check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Check once the host signals that initial UI setup is done.
    pub check_on_ready: bool,
    /// Check every time the host returns to the foreground.
    pub check_on_foreground: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            check_on_ready: true,
            check_on_foreground: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = HandoffConfig::default();
        assert_eq!(config.general.data_dir, "~/.handoff/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.store.file_name, "handoff.db");
        assert_eq!(config.store.busy_timeout_ms, 5000);
        assert!(config.dispatch.check_on_ready);
        assert!(config.dispatch.check_on_foreground);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/custom/data"
log_level = "debug"

[store]
file_name = "shared.db"
busy_timeout_ms = 250

[dispatch]
check_on_ready = true
check_on_foreground = false
"#;
        let file = create_temp_config(content);
        let config = HandoffConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/custom/data");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.store.file_name, "shared.db");
        assert_eq!(config.store.busy_timeout_ms, 250);
        assert!(!config.dispatch.check_on_foreground);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = HandoffConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.data_dir, "~/.handoff/data");
        assert_eq!(config.store.file_name, "handoff.db");
        assert!(config.dispatch.check_on_ready);
    }

    #[test]
    fn test_load_empty_file_uses_all_defaults() {
        let file = create_temp_config("");
        let config = HandoffConfig::load(file.path()).unwrap();
        assert_eq!(config.store.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let err = HandoffConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, HandoffError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = HandoffConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.data_dir, "~/.handoff/data");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = HandoffConfig::default();
        config.dispatch.check_on_ready = false;
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = HandoffConfig::load(&path).unwrap();
        assert!(!reloaded.dispatch.check_on_ready);
        assert_eq!(reloaded.store.file_name, config.store.file_name);
    }
}
