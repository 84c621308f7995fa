//! Runtime configuration.
//!
//! Resolved once at startup, then passed by reference:
//!
//! 1. built-in defaults (Maven Central, server id `central`)
//! 2. credentials and repository URL from `~/.m2/settings.xml`
//! 3. an optional TOML file given with `--config`
//!
//! ```toml
//! [repository]
//! base_url = "https://artifactory.example.com/artifactory/libs-release"
//! api_key = "AKCp..."
//! server_id = "central"
//!
//! [changes]
//! log_skipped = false
//! ```

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://repo1.maven.org/maven2";
pub const DEFAULT_SERVER_ID: &str = "central";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub changes: ChangesConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RepositoryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub server_id: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            server_id: DEFAULT_SERVER_ID.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ChangesConfig {
    /// Write `Skipped` lines for artifacts left untouched.
    pub log_skipped: bool,
}

/// Partial view of a config file; only keys present in the file override.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ConfigOverlay {
    repository: RepositoryOverlay,
    changes: ChangesOverlay,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RepositoryOverlay {
    base_url: Option<String>,
    api_key: Option<String>,
    server_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ChangesOverlay {
    log_skipped: Option<bool>,
}

impl Config {
    /// Full resolution: defaults, Maven settings, then `config_file`.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let overlay = match config_file {
            Some(path) => Some(read_overlay(path)?),
            None => None,
        };

        let mut config = Config::default();
        if let Some(id) = overlay.as_ref().and_then(|o| o.repository.server_id.clone()) {
            config.repository.server_id = id;
        }

        if let Some(settings) = default_settings_path() {
            config.apply_settings_file(&settings);
        }
        if let Some(overlay) = overlay {
            config.apply_overlay(overlay);
        }
        Ok(config)
    }

    /// Repository root without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.repository.base_url.trim_end_matches('/')
    }

    pub fn api_key(&self) -> Option<&str> {
        self.repository.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Reads server credentials from a Maven `settings.xml`. The server
    /// password becomes the API key, and the `<repository><url>` with the same
    /// id replaces the base URL. Problems are logged and leave the config
    /// unchanged.
    pub fn apply_settings_file(&mut self, path: &Path) {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("no maven settings at {}: {}", path.display(), e);
                return;
            }
        };
        match MavenServer::from_settings(&content, &self.repository.server_id) {
            Some(server) => {
                tracing::info!("using server '{}' from {}", server.id, path.display());
                if let Some(url) = server.url {
                    self.repository.base_url = url;
                }
                if server.password.is_some() {
                    self.repository.api_key = server.password;
                }
            }
            None => tracing::debug!(
                "server '{}' not found in {}",
                self.repository.server_id,
                path.display()
            ),
        }
    }

    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let repo = overlay.repository;
        if let Some(url) = repo.base_url {
            self.repository.base_url = url;
        }
        if let Some(key) = repo.api_key {
            self.repository.api_key = Some(key);
        }
        if let Some(id) = repo.server_id {
            self.repository.server_id = id;
        }
        if let Some(flag) = overlay.changes.log_skipped {
            self.changes.log_skipped = flag;
        }
    }
}

fn read_overlay(path: &Path) -> Result<ConfigOverlay, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".m2").join("settings.xml"))
}

/// A `<server>` entry joined with the `<repository>` of the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenServer {
    pub id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
}

impl MavenServer {
    pub fn from_settings(xml: &str, server_id: &str) -> Option<Self> {
        let server = blocks(xml, "server")
            .into_iter()
            .find(|block| child_text(block, "id").as_deref() == Some(server_id))?;

        let url = blocks(xml, "repository")
            .into_iter()
            .find(|block| child_text(block, "id").as_deref() == Some(server_id))
            .and_then(|block| child_text(block, "url"));

        Some(Self {
            id: server_id.to_string(),
            username: child_text(server, "username"),
            password: child_text(server, "password"),
            url,
        })
    }
}

fn blocks<'x>(xml: &'x str, tag: &str) -> Vec<&'x str> {
    let pattern = format!(r"(?s)<{tag}>(.*?)</{tag}>");
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures_iter(xml)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn child_text(block: &str, tag: &str) -> Option<String> {
    blocks(block, tag)
        .first()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<settings xmlns="http://maven.apache.org/SETTINGS/1.0.0">
  <servers>
    <server>
      <id>snapshots</id>
      <username>snap</username>
      <password>snap-key</password>
    </server>
    <server>
      <id>central</id>
      <username>deployer</username>
      <password>AKCp-secret</password>
    </server>
  </servers>
  <profiles>
    <profile>
      <repositories>
        <repository>
          <id>central</id>
          <url>https://artifactory.example.com/libs-release/</url>
        </repository>
      </repositories>
    </profile>
  </profiles>
</settings>"#;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), None);
        assert!(!config.changes.log_skipped);
    }

    #[test]
    fn test_maven_server_lookup() {
        let server = MavenServer::from_settings(SETTINGS, "central").unwrap();
        assert_eq!(server.username.as_deref(), Some("deployer"));
        assert_eq!(server.password.as_deref(), Some("AKCp-secret"));
        assert_eq!(
            server.url.as_deref(),
            Some("https://artifactory.example.com/libs-release/")
        );
        assert!(MavenServer::from_settings(SETTINGS, "missing").is_none());
    }

    #[test]
    fn test_settings_then_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.xml");
        fs::write(&settings, SETTINGS).unwrap();

        let mut config = Config::default();
        config.apply_settings_file(&settings);
        assert_eq!(config.base_url(), "https://artifactory.example.com/libs-release");
        assert_eq!(config.api_key(), Some("AKCp-secret"));

        let overlay: ConfigOverlay = toml::from_str(
            r#"
[repository]
base_url = "https://mirror.example.org/maven2"

[changes]
log_skipped = true
"#,
        )
        .unwrap();
        config.apply_overlay(overlay);
        assert_eq!(config.base_url(), "https://mirror.example.org/maven2");
        assert_eq!(config.api_key(), Some("AKCp-secret"));
        assert!(config.changes.log_skipped);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let err = Config::load(Some(Path::new("no/such/jar-manager.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[repository\nbase_url = ").unwrap();
        assert!(matches!(read_overlay(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let mut config = Config::default();
        config.repository.api_key = Some(String::new());
        assert_eq!(config.api_key(), None);
    }
}
