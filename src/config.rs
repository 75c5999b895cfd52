use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciergeConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Retrieval windows and quotas for the search cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default lookback when the request carries no start date (days)
    pub default_window_days: i64,
    /// Widened window for stages 3-4 (days before date_to)
    pub widened_window_days: i64,
    /// Last-resort window for stage 5 (days before date_to)
    pub last_resort_window_days: i64,
    /// Documents retrieved per request
    pub target_articles: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_window_days: 7,
            widened_window_days: 30,
            last_resort_window_days: 90,
            target_articles: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier sent to the generation provider
    pub model: String,
    pub max_tokens: u32,
    /// Low temperature keeps the narrative close to the source articles
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 2000,
            temperature: 0.1,
        }
    }
}

impl ConciergeConfig {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = ConciergeConfig::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: ConciergeConfig = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".newsdesk").join("config.toml"))
    }
}
