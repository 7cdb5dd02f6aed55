use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Connection settings for the text-generation service. Loaded once at
/// startup from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

pub fn load_config(path: &Path) -> Result<GenerationConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let cfg: GenerationConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(cfg)
}
