use anyhow::{Context, Result};
use aria_core::classifier::DEFAULT_CACHE_CAPACITY;
use aria_memory::quota::DEFAULT_MONTHLY_CAP;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assistant_name: String,
    pub user_name: String,
    pub data_dir: PathBuf,
    pub history_window: usize,
    pub search_quota: u32,
    pub classifier_cache_size: usize,
    pub llm: LlmConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_name: "Aria".to_string(),
            user_name: "User".to_string(),
            data_dir: PathBuf::from("./data"),
            history_window: 6,
            search_quota: DEFAULT_MONTHLY_CAP,
            classifier_cache_size: DEFAULT_CACHE_CAPACITY,
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search".to_string(),
        }
    }
}

impl Config {
    /// Read `config.toml` if present, else defaults. Endpoint and model can
    /// be overridden per environment; API keys come only from the
    /// environment and are treated as opaque strings.
    pub fn load() -> Result<Self> {
        let path = PathBuf::from("config.toml");
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(&path).context("Failed to read config.toml")?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(endpoint) = std::env::var("ARIA_LLM_ENDPOINT") {
            config.llm.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("ARIA_LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(endpoint) = std::env::var("ARIA_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    pub fn llm_api_key() -> Option<String> {
        std::env::var("ARIA_LLM_API_KEY").ok()
    }

    pub fn search_api_key() -> Option<String> {
        std::env::var("ARIA_SEARCH_API_KEY").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search_quota, 100);
        assert_eq!(config.history_window, 6);
        assert_eq!(config.classifier_cache_size, 512);
        assert!(!config.llm.endpoint.is_empty());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = Config::from_toml(
            r#"
            assistant_name = "Jarvis"
            user_name = "Tony"

            [llm]
            model = "some-model"
            "#,
        )
        .unwrap();

        assert_eq!(config.assistant_name, "Jarvis");
        assert_eq!(config.user_name, "Tony");
        assert_eq!(config.llm.model, "some-model");
        // Unspecified fields keep defaults.
        assert_eq!(config.llm.endpoint, LlmConfig::default().endpoint);
        assert_eq!(config.search_quota, 100);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml("history_window = \"six\"").is_err());
    }

    #[test]
    fn test_env_override_takes_precedence() {
        std::env::set_var("ARIA_LLM_ENDPOINT", "http://localhost:9999/v1");
        let config = Config::load().unwrap();
        assert_eq!(config.llm.endpoint, "http://localhost:9999/v1");
        std::env::remove_var("ARIA_LLM_ENDPOINT");
    }
}
