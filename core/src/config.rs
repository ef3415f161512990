use crate::errors::{GeminiError, GeminiResult};
use crate::persona::TRAVEL_MITRA_INSTRUCTION;
use crate::types::{GenerationConfig, SafetySetting};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling parameters sent with every chat request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: i32,
    pub max_output_tokens: i32,
    pub response_mime_type: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 2.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
        }
    }
}

impl GenerationSettings {
    pub fn to_generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
            top_k: Some(self.top_k),
            candidate_count: None,
            max_output_tokens: Some(self.max_output_tokens),
            response_mime_type: Some(self.response_mime_type.clone()),
        }
    }
}

/// Named safety filter sets, used when no explicit `safety_settings` list is given
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SafetyPreset {
    /// Send no safety settings; the API defaults apply
    #[default]
    Off,
    /// Block hate speech and harassment at the lowest probability level
    Strict,
}

/// Configuration struct for Gemini API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
    pub generation: Option<GenerationSettings>,
    pub safety: Option<SafetyPreset>,
    pub safety_settings: Option<Vec<SafetySetting>>,
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    /// The built-in TravelMitra configuration. The API key always comes from
    /// the environment or the config file.
    pub fn travel_mitra() -> Self {
        Self {
            api_key: None,
            system_prompt: Some(TRAVEL_MITRA_INSTRUCTION.to_string()),
            model_name: Some(DEFAULT_MODEL.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            generation: Some(GenerationSettings::default()),
            safety: None,
            safety_settings: None,
            timeout_secs: None,
        }
    }

    /// Safety settings to send with each request. An explicit list wins over
    /// the preset.
    pub fn resolved_safety_settings(&self) -> Vec<SafetySetting> {
        if let Some(settings) = &self.safety_settings {
            return settings.clone();
        }

        match self.safety.unwrap_or_default() {
            SafetyPreset::Off => Vec::new(),
            SafetyPreset::Strict => SafetySetting::strict_defaults(),
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            system_prompt: other
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            generation: other.generation.clone().or_else(|| self.generation.clone()),
            safety: other.safety.or(self.safety),
            safety_settings: other
                .safety_settings
                .clone()
                .or_else(|| self.safety_settings.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }
}

/// Reads and parses a TOML file, returning `T::default()` when the file does not exist
pub fn load_toml_file<T: DeserializeOwned + Default>(path: &Path) -> GeminiResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| GeminiError::ConfigError(format!("Failed to read config file: {}", e)))?;

    toml::from_str(&content)
        .map_err(|e| GeminiError::ConfigError(format!("Failed to parse config file: {}", e)))
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
