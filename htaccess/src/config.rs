//! Command-line configuration file
//!
//! ```toml
//! [render]
//! indent = "    "
//! line_ending = "crlf"
//!
//! [route]
//! default_page = "index.php"
//! ```

use anyhow::{Context, bail};
use htaccess_parser::RenderOptions;
use htaccess_route::RouteConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub render: RenderOptions,
    pub route: RouteConfig,
}

impl CliConfig {
    /// Load from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => bail!("Unknown config format: {:?}", ext),
        }
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Invalid JSON config")
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid TOML config")
    }
}
