use serde::{Deserialize, Serialize};

use crate::layout::RepoLayout;
use crate::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub serve: ServeConfig,
}

/// Settings for the HTTP browsing server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Extensions served as plain text.
    #[serde(default = "default_text_extensions")]
    pub text_extensions: Vec<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_text_extensions() -> Vec<String> {
    vec!["md".to_string(), "go".to_string()]
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            text_extensions: default_text_extensions(),
        }
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            version: 1,
            name: None,
            default_branch: default_branch(),
            serve: ServeConfig::default(),
        }
    }
}

pub fn write_config(layout: &RepoLayout, config: &RepoConfig) -> Result<(), StoreError> {
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| StoreError::Config(e.to_string()))?;
    std::fs::write(layout.config_file(), toml_str)?;
    Ok(())
}

pub fn write_default_config(layout: &RepoLayout) -> Result<(), StoreError> {
    write_config(layout, &RepoConfig::default())
}

/// Read `repo.toml`; a missing file yields the defaults.
pub fn read_config(layout: &RepoLayout) -> Result<RepoConfig, StoreError> {
    let path = layout.config_file();
    if !path.exists() {
        return Ok(RepoConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    let config: RepoConfig =
        toml::from_str(&content).map_err(|e| StoreError::Config(e.to_string()))?;
    Ok(config)
}
