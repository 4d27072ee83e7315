//! Configuration file support for dedup runs

use anyhow::{Context, Result};
use rowdedup_core::{DedupOptions, Keep};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dedup run configuration loaded from YAML or TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub dedup: DedupOptions,
}

impl DedupFileConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        match extension(path) {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            other => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                other
            )),
        }
    }

    /// Save configuration to a file
    #[allow(dead_code)]
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match extension(path) {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            other => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    other
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Merge command-line overrides into the file options
    pub fn options_with(&self, subset: Option<Vec<String>>, keep: Option<Keep>) -> DedupOptions {
        let mut options = self.dedup.clone();
        if subset.is_some() {
            options.subset = subset;
        }
        if let Some(keep) = keep {
            options.keep = keep;
        }
        options
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|s| s.to_str()).unwrap_or("")
}
