//! Router configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where the rules come from and what to serve when none match
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Page returned when no rewrite rule matches
    pub default_page: String,
    /// `.htaccess` file to load; `None` routes everything to the default page
    pub htaccess_path: Option<PathBuf>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            default_page: "index.html".to_string(),
            htaccess_path: None,
        }
    }
}
