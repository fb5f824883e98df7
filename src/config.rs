/// Application configuration
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::DEFAULT_CATEGORY;
use crate::storage::get_data_dir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the task snapshot lives; defaults to ~/.doable
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Fixed set of task categories
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<String> {
    vec![
        "Work".to_string(),
        "Personal".to_string(),
        "Shopping".to_string(),
        DEFAULT_CATEGORY.to_string(),
    ]
}

impl Config {
    /// Resolve the effective data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(get_data_dir)
    }

    /// Map arbitrary category input onto the configured set; anything
    /// unknown falls back to the default category.
    pub fn normalize_category(&self, category: &str) -> String {
        let category = category.trim();
        self.categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(category))
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }
}

/// Get the config file path
/// All platforms: ~/.doable/config.toml
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

pub fn save_config(config: &Config) -> Result<()> {
    let config_path = get_config_path();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(config_path, content)?;

    Ok(())
}

/// Update the configured category set
pub fn set_categories(raw: &str) -> Result<()> {
    let mut categories: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    // The default category always exists as the fallback.
    if !categories.iter().any(|c| c == DEFAULT_CATEGORY) {
        categories.push(DEFAULT_CATEGORY.to_string());
    }

    let mut config = load_config()?;
    config.categories = categories;
    save_config(&config)?;
    println!("Categories set to: {}", config.categories.join(", "));
    Ok(())
}

/// Update the data directory override
pub fn set_data_dir(path: &str) -> Result<()> {
    let mut config = load_config()?;
    config.data_dir = Some(PathBuf::from(path));
    save_config(&config)?;
    println!("Data directory set to: {}", path);
    Ok(())
}

/// Show the current configuration
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("Current configuration:");
    println!("  Data directory: {}", config.data_dir().display());
    println!("  Categories:     {}", config.categories.join(", "));
    println!();
    println!("Config file: {}", get_config_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_fallback_category() {
        let config = Config::default();
        assert!(config.categories.iter().any(|c| c == DEFAULT_CATEGORY));
    }

    #[test]
    fn test_normalize_category_is_case_insensitive() {
        let config = Config::default();
        assert_eq!(config.normalize_category("work"), "Work");
        assert_eq!(config.normalize_category(" personal "), "Personal");
        assert_eq!(config.normalize_category("garden"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.categories, default_categories());
    }

    #[test]
    fn test_partial_toml_keeps_unset_defaults() {
        let config: Config = toml::from_str(r#"data_dir = "/tmp/tasks""#).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tasks")));
        assert_eq!(config.categories, default_categories());
    }
}
