//! URL resolution
//!
//! Wraps a [`RewriteTable`] with the configured fallback page.

use crate::config::RouteConfig;
use crate::error::Result;
use crate::rewrite::RewriteTable;
use std::fmt;

/// Outcome of resolving a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A rule or error document matched
    Rewrite(String),
    /// Nothing matched; the configured default page
    Default(String),
}

impl Resolution {
    pub fn target(&self) -> &str {
        match self {
            Resolution::Rewrite(target) | Resolution::Default(target) => target,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Rewrite(target) => write!(f, "rewrite {}", target),
            Resolution::Default(target) => write!(f, "default {}", target),
        }
    }
}

pub struct Router {
    config: RouteConfig,
    table: RewriteTable,
}

impl Router {
    /// Router with an empty table
    pub fn new(config: RouteConfig) -> Self {
        Self::with_table(config, RewriteTable::new())
    }

    pub fn with_table(config: RouteConfig, table: RewriteTable) -> Self {
        Self { config, table }
    }

    /// Read and parse the configured `.htaccess` file.
    ///
    /// No path, or a path that does not exist, gives an empty table. Other
    /// read errors are returned.
    pub fn load(config: RouteConfig) -> Result<Self> {
        let Some(path) = config.htaccess_path.as_ref() else {
            return Ok(Self::new(config));
        };

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, routing to default page", path.display());
                return Ok(Self::new(config));
            }
            Err(e) => return Err(e.into()),
        };

        let doc = htaccess_parser::parse(&source);
        let table = RewriteTable::from_document(&doc);
        Ok(Self::with_table(config, table))
    }

    pub fn resolve(&self, url: &str) -> Resolution {
        match self.table.rewrite(url) {
            Some(target) => Resolution::Rewrite(target),
            None => Resolution::Default(self.config.default_page.clone()),
        }
    }

    /// Error document for a status code, or the default page
    pub fn error_page(&self, code: &str) -> Resolution {
        match self.table.error_document(code) {
            Some(page) => Resolution::Rewrite(page.to_string()),
            None => Resolution::Default(self.config.default_page.clone()),
        }
    }

    pub fn table(&self) -> &RewriteTable {
        &self.table
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_for(path: &std::path::Path) -> RouteConfig {
        RouteConfig {
            default_page: "home.html".to_string(),
            htaccess_path: Some(path.to_path_buf()),
        }
    }

    #[test]
    fn test_load_and_resolve() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "RewriteEngine On\nRewriteRule ^about$ /about.html\nErrorDocument 404 /404.html\n"
        )
        .unwrap();

        let router = Router::load(config_for(file.path())).unwrap();
        assert_eq!(
            router.resolve("about"),
            Resolution::Rewrite("/about.html".to_string())
        );
        assert_eq!(
            router.resolve("contact"),
            Resolution::Default("home.html".to_string())
        );
        assert_eq!(router.error_page("404").target(), "/404.html");
        assert_eq!(
            router.error_page("500"),
            Resolution::Default("home.html".to_string())
        );
    }

    #[test]
    fn test_missing_file_gives_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let router = Router::load(config_for(&dir.path().join(".htaccess"))).unwrap();
        assert!(router.table().is_empty());
        assert_eq!(router.resolve("anything").target(), "home.html");
    }

    #[test]
    fn test_no_path_gives_empty_table() {
        let router = Router::load(RouteConfig::default()).unwrap();
        assert!(router.table().is_empty());
        assert_eq!(router.resolve("x"), Resolution::Default("index.html".to_string()));
    }

    #[test]
    fn test_directory_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Router::load(config_for(dir.path())).is_err());
    }
}
