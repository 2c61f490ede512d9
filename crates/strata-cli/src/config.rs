use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::{Direction, LayoutOptions};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "strata.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text` or `json`. Unknown values are ignored.
    #[serde(default)]
    pub format: Option<String>,
}

impl StrataConfig {
    pub const fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            direction: self.layout.direction,
        }
    }
}

/// Load the config file.
///
/// An explicit path must exist. Without one, `strata.toml` in `cwd` is used
/// if present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<StrataConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = cwd.join(CONFIG_FILE);
            if !path.exists() {
                return Ok(StrataConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<StrataConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
