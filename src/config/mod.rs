//! Configuration management.
//!
//! Settings come from a TOML file layered under `SITASI__*` environment
//! variables:
//!
//! ```toml
//! [endpoints]
//! works_url = "https://api.crossref.org"
//! isbn_url = "http://xisbn.worldcat.org/webservices/xid"
//! geo_url = "http://gd.geobytes.com"
//! ner_url = "http://localhost:9000"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! max_attempts = 1
//! user_agent = "sitasi/0.1.0"
//! mailto = "librarian@example.org"
//!
//! [matching]
//! min_score = 2.0
//! min_similarity = 80.0
//!
//! [output]
//! locale = "id"
//! ```
//!
//! For example `SITASI__OUTPUT__LOCALE=en` overrides `[output] locale`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::Locale;
use crate::sources::{CORENLP_API_BASE, CROSSREF_API_BASE, GEOBYTES_API_BASE, XISBN_API_BASE};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SITASI";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URLs of the upstream services
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Disambiguation gate thresholds
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Presentation settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write the configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// Upstream service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_works_url")]
    pub works_url: String,

    #[serde(default = "default_isbn_url")]
    pub isbn_url: String,

    #[serde(default = "default_geo_url")]
    pub geo_url: String,

    #[serde(default = "default_ner_url")]
    pub ner_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            works_url: default_works_url(),
            isbn_url: default_isbn_url(),
            geo_url: default_geo_url(),
            ner_url: default_ner_url(),
        }
    }
}

fn default_works_url() -> String {
    CROSSREF_API_BASE.to_string()
}

fn default_isbn_url() -> String {
    XISBN_API_BASE.to_string()
}

fn default_geo_url() -> String {
    GEOBYTES_API_BASE.to_string()
}

fn default_ner_url() -> String {
    CORENLP_API_BASE.to_string()
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Attempts per upstream call; 1 disables retries
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Contact address sent to services with a polite pool (CrossRef)
    #[serde(default)]
    pub mailto: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_attempts: default_max_attempts(),
            user_agent: default_user_agent(),
            mailto: None,
        }
    }
}

impl HttpConfig {
    /// `User-Agent` header value, with the contact address when one is set
    pub fn user_agent_header(&self) -> String {
        match self.mailto.as_deref().map(str::trim) {
            Some(mailto) if !mailto.is_empty() => {
                format!("{} (mailto:{})", self.user_agent, mailto)
            }
            _ => self.user_agent.clone(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    1
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Disambiguation gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum relevance score reported by the works index
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Minimum query/title similarity, 0-100
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            min_similarity: default_min_similarity(),
        }
    }
}

fn default_min_score() -> f64 {
    2.0
}

fn default_min_similarity() -> f64 {
    80.0
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub locale: Locale,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Get the default configuration with environment overrides applied
pub fn get_config() -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("sitasi.toml");
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// `<config_dir>/sitasi/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sitasi").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.matching.min_score, 2.0);
        assert_eq!(config.matching.min_similarity, 80.0);
        assert_eq!(config.http.max_attempts, 1);
        assert_eq!(config.output.locale, Locale::En);
        assert_eq!(config.endpoints.works_url, "https://api.crossref.org");
    }

    #[test]
    fn test_user_agent_header() {
        let mut http = HttpConfig::default();
        assert!(!http.user_agent_header().contains("mailto"));

        http.mailto = Some("me@example.org".to_string());
        assert!(http.user_agent_header().ends_with("(mailto:me@example.org)"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sitasi.toml");
        std::fs::write(
            &path,
            r#"
[endpoints]
works_url = "http://localhost:1234"

[matching]
min_score = 3.5

[output]
locale = "id"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.endpoints.works_url, "http://localhost:1234");
        assert_eq!(config.endpoints.isbn_url, XISBN_API_BASE);
        assert_eq!(config.matching.min_score, 3.5);
        assert_eq!(config.matching.min_similarity, 80.0);
        assert_eq!(config.output.locale, Locale::Id);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.http.mailto = Some("me@example.org".to_string());
        config.output.locale = Locale::Id;
        config.save(&path).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(&path).is_err());
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }
}
