use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tripdarzee_core::config::{GeminiConfig, get_default_config_file, load_toml_file};
use tripdarzee_core::session::HistoryWindow;
use tripdarzee_places::PlacesConfig;

use crate::cli::Args;
use crate::router::RouterMode;

pub const APP_NAME: &str = "tripdarzee";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings for the chat loop itself
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ChatConfig {
    pub router: Option<RouterMode>,
    pub history_window: Option<usize>,
}

impl ChatConfig {
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            router: other.router.or(self.router),
            history_window: other.history_window.or(self.history_window),
        }
    }

    pub fn window(&self) -> HistoryWindow {
        HistoryWindow {
            max_messages: self.history_window,
        }
    }
}

/// Everything the binary needs, in one file-shaped struct
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub gemini: GeminiConfig,
    pub places: PlacesConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Built-in defaults
    pub fn defaults() -> Self {
        Self {
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            gemini: GeminiConfig::travel_mitra(),
            places: PlacesConfig::default(),
            chat: ChatConfig::default(),
        }
    }

    /// Resolves the configuration: defaults, then the config file, then the
    /// environment, then command-line flags.
    pub fn load(args: &Args) -> Result<Self> {
        let file = Self::from_file(args.config.clone())?;
        let env = Self::from_env(|key| env::var(key).ok());
        Ok(Self::defaults()
            .merge(&file)
            .merge(&env)
            .merge(&Self::from_args(args)))
    }

    fn from_file(explicit: Option<PathBuf>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                path
            }
            None => match get_default_config_file(APP_NAME) {
                Ok(path) => path,
                // No home directory: nothing to load
                Err(_) => return Ok(Self::default()),
            },
        };

        load_toml_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// API keys from the environment
    pub fn from_env<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                ..Default::default()
            },
            places: PlacesConfig {
                api_key: get("MAPS_API_KEY"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self {
            log_level: args.log_level.clone(),
            gemini: GeminiConfig {
                model_name: args.model.clone(),
                ..Default::default()
            },
            places: PlacesConfig {
                provider: args.places_provider,
                base_url: args.places_base_url.clone(),
                radius_meters: args.radius,
                ..Default::default()
            },
            chat: ChatConfig {
                router: args.router,
                history_window: args.history_window,
            },
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            gemini: self.gemini.merge(&other.gemini),
            places: self.places.merge(&other.places),
            chat: self.chat.merge(&other.chat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;
    use tripdarzee_places::PlacesProviderKind;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults();
        assert_eq!(config.gemini.model_name.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(config.places.radius(), 2000);
        assert_eq!(config.chat.router, None);
        assert_eq!(config.chat.window(), HistoryWindow::unbounded());
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_env_supplies_api_keys() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("GEMINI_API_KEY", "gem-key"), ("MAPS_API_KEY", "maps-key")]);
        let env = AppConfig::from_env(|key| vars.get(key).map(|v| v.to_string()));

        let config = AppConfig::defaults().merge(&env);
        assert_eq!(config.gemini.api_key.as_deref(), Some("gem-key"));
        assert_eq!(config.places.api_key.as_deref(), Some("maps-key"));
        // Defaults survive the merge
        assert!(config.gemini.system_prompt.is_some());
    }

    #[test]
    fn test_layering_file_env_args() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
log_level = "info"

[gemini]
api_key = "file-key"
model_name = "gemini-1.5-pro"

[places]
provider = "rest"
base_url = "http://maps.internal"
radius_meters = 800

[chat]
router = "legacy"
history_window = 20
"#,
        )
        .unwrap();

        let args = Args {
            config: Some(path),
            radius: Some(1500),
            router: Some(RouterMode::Strict),
            ..Default::default()
        };

        let file = AppConfig::from_file(args.config.clone()).unwrap();
        let env = AppConfig::from_env(|key| (key == "GEMINI_API_KEY").then(|| "env-key".to_string()));
        let config = AppConfig::defaults()
            .merge(&file)
            .merge(&env)
            .merge(&AppConfig::from_args(&args));

        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.gemini.model_name.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.places.provider, Some(PlacesProviderKind::Rest));
        assert_eq!(config.places.base_url.as_deref(), Some("http://maps.internal"));
        assert_eq!(config.places.radius(), 1500);
        assert_eq!(config.chat.router, Some(RouterMode::Strict));
        assert_eq!(config.chat.window(), HistoryWindow::last(20));
    }

    #[test]
    fn test_explicit_missing_config_file_is_error() {
        let dir = tempdir().unwrap();
        let result = AppConfig::from_file(Some(dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[places]\nprovider = \"carrier-pigeon\"\n").unwrap();

        let err = AppConfig::from_file(Some(path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load configuration"));
    }
}
