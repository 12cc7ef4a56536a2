//! Configuration management for confsync.
//!
//! Parses `confsync.toml` files with serde and provides auto-discovery of
//! config files in parent directories. The Confluence bearer token is never
//! stored in the file; it is read from the `CONFLUENCE_BEARER_TOKEN`
//! environment variable during [`Config::resolve`].
//!
//! Validation is fail-fast but complete: [`Config::resolve`] reports every
//! missing setting at once instead of one per run.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "confsync.toml";

/// Environment variable holding the Confluence bearer token.
pub const TOKEN_ENV_VAR: &str = "CONFLUENCE_BEARER_TOKEN";

/// Application configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection settings.
    pub confluence: ConfluenceConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence base URL (e.g. `https://confluence.example.com`).
    pub url: Option<String>,
    /// Target space key.
    pub space: Option<String>,
    /// Optional parent page title; synced pages become its children.
    pub parent_page: Option<String>,
    /// Enable debug-level logging.
    pub debug: bool,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            space: None,
            parent_page: None,
            debug: true,
        }
    }
}

/// Fully resolved settings the synchronizer consumes.
///
/// Produced by [`Config::resolve`]; every field here is guaranteed present
/// and non-empty.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Confluence base URL.
    pub url: String,
    /// Bearer token from the environment.
    pub token: String,
    /// Target space key.
    pub space: String,
    /// Optional parent page title.
    pub parent_page: Option<String>,
    /// Debug-level logging flag.
    pub debug: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// One or more required settings are missing.
    #[error("missing required settings: {}", .0.join(", "))]
    Missing(Vec<String>),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `confsync.toml` in the current directory and parents,
    /// falling back to defaults when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the loaded configuration into [`SyncSettings`].
    ///
    /// Reads the bearer token from [`TOKEN_ENV_VAR`] and checks that all
    /// required settings are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming every absent setting.
    pub fn resolve(&self) -> Result<SyncSettings, ConfigError> {
        let token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());

        let mut missing = Vec::new();
        if non_empty(self.confluence.url.as_deref()).is_none() {
            missing.push("confluence.url".to_owned());
        }
        if non_empty(self.confluence.space.as_deref()).is_none() {
            missing.push("confluence.space".to_owned());
        }
        if token.is_none() {
            missing.push(format!("{TOKEN_ENV_VAR} (environment)"));
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(SyncSettings {
            url: self.confluence.url.clone().unwrap_or_default(),
            token: token.unwrap_or_default(),
            space: self.confluence.space.clone().unwrap_or_default(),
            parent_page: self.confluence.parent_page.clone(),
            debug: self.confluence.debug,
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_config() -> Config {
        Config {
            confluence: ConfluenceConfig {
                url: Some("https://confluence.example.com".to_owned()),
                space: Some("DOCS".to_owned()),
                parent_page: Some("Home".to_owned()),
                debug: false,
            },
            config_path: None,
        }
    }

    #[test]
    fn parses_confluence_section() {
        let config: Config = toml::from_str(
            r#"
            [confluence]
            url = "https://confluence.example.com"
            space = "DOCS"
            parent_page = "Home"
            debug = false
            "#,
        )
        .unwrap();

        assert_eq!(
            config.confluence.url.as_deref(),
            Some("https://confluence.example.com")
        );
        assert_eq!(config.confluence.space.as_deref(), Some("DOCS"));
        assert_eq!(config.confluence.parent_page.as_deref(), Some("Home"));
        assert!(!config.confluence.debug);
    }

    #[test]
    fn defaults_to_debug_logging() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.confluence.debug);
        assert_eq!(config.confluence.url, None);
    }

    #[test]
    fn resolve_reports_all_missing_settings_at_once() {
        let config = Config::default();
        // Note: relies on CONFLUENCE_BEARER_TOKEN being unset in the test
        // environment; url and space are always missing here.
        let err = config.resolve().unwrap_err();
        let ConfigError::Missing(fields) = err else {
            panic!("expected Missing, got {err:?}");
        };
        assert!(fields.contains(&"confluence.url".to_owned()));
        assert!(fields.contains(&"confluence.space".to_owned()));
    }

    #[test]
    fn resolve_treats_empty_strings_as_missing() {
        let mut config = full_config();
        config.confluence.space = Some(String::new());
        let err = config.resolve().unwrap_err();
        let ConfigError::Missing(fields) = err else {
            panic!("expected Missing, got {err:?}");
        };
        assert!(fields.contains(&"confluence.space".to_owned()));
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confsync.toml");
        std::fs::write(&path, "[confluence]\nspace = \"DOCS\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.confluence.space.as_deref(), Some("DOCS"));
        assert_eq!(config.config_path, Some(path));
    }
}
