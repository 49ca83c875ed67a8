//! Configuration for reaching the content API.
//!
//! Settings are stored as TOML. [`ApiConfig::load`] reads `api.toml` from the
//! platform config directory and falls back to defaults when no file exists;
//! the `WAGTAIL_API_URL` environment variable overrides the base URL either
//! way.
//!
//! ## Example Configuration File
//!
//! ```toml
//! base_url = "https://cms.example.com/api/v2/"
//! timeout_secs = 15
//! user_agent = "my-frontend/1.0"
//! home_page_type = "home.HomePage"
//! ```
//!
//! ```rust
//! use wagtail_core::ApiConfig;
//!
//! let config: ApiConfig = toml::from_str("base_url = \"https://cms.example.com/api/v2/\"")?;
//! assert_eq!(config.timeout_secs, 30);
//! assert_eq!(config.home_page_type, "home.HomePage");
//! # Ok::<(), toml::de::Error>(())
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "WAGTAIL_API_URL";

/// Settings for the HTTP transport and the resource client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the Wagtail API, e.g. `http://localhost:8000/api/v2/`.
    pub base_url: String,

    /// Request timeout applied by the HTTP client, in seconds.
    ///
    /// The resource client and store apply no timeout of their own.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Page type used to locate the home page (`?type=...`).
    pub home_page_type: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v2/".to_string(),
            timeout_secs: 30,
            user_agent: concat!("wagtail-core/", env!("CARGO_PKG_VERSION")).to_string(),
            home_page_type: "home.HomePage".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from the default location, or defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::read(path)?.with_env_overrides())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    fn config_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "wagtail", "wagtail-core")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join("api.toml"))
    }

    fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Using {} from {}", url, BASE_URL_ENV);
            self.base_url = url;
        }
        self
    }

    /// Check that the settings can be used to build a transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unparsable or non-HTTP base URL, or a
    /// zero timeout.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than zero".into()));
        }
        if self.home_page_type.trim().is_empty() {
            return Err(Error::Config("home_page_type must not be empty".into()));
        }
        Ok(())
    }

    /// The base URL, parsed and normalized to end with `/` so relative
    /// resource paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL cannot be parsed or is not http(s).
    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(self.base_url.trim())
            .map_err(|e| Error::Config(format!("Invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_values() {
        let config = ApiConfig::default();

        assert_eq!(config.base_url, "http://localhost:8000/api/v2/");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("wagtail-core/"));
        assert_eq!(config.home_page_type, "home.HomePage");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_fills_missing_fields() -> Result<()> {
        let temp_dir = TempDir::new().map_err(|e| Error::Config(e.to_string()))?;
        let path = temp_dir.path().join("api.toml");
        fs::write(&path, "timeout_secs = 5\nhome_page_type = \"site.LandingPage\"\n")
            .map_err(|e| Error::Config(e.to_string()))?;

        let config = ApiConfig::read(&path)?;

        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.home_page_type, "site.LandingPage");
        assert_eq!(config.base_url, ApiConfig::default().base_url);
        Ok(())
    }

    #[test]
    fn test_load_from_missing_file_is_config_error() {
        let result = ApiConfig::load_from(Path::new("/definitely/does/not/exist/api.toml"));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("Failed to read config")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        match ApiConfig::read(&path) {
            Err(Error::Config(msg)) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_base_url_override_ignores_blank_values() {
        let config = ApiConfig::default().with_base_url_override(Some("   ".to_string()));
        assert_eq!(config.base_url, ApiConfig::default().base_url);

        let config = ApiConfig::default()
            .with_base_url_override(Some("https://cms.example.com/api/v2/".to_string()));
        assert_eq!(config.base_url, "https://cms.example.com/api/v2/");
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://cms.example.com/api/v2".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://cms.example.com/api/v2/"
        );
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let bad = [
            ApiConfig {
                base_url: "not a url".to_string(),
                ..ApiConfig::default()
            },
            ApiConfig {
                base_url: "ftp://cms.example.com/".to_string(),
                ..ApiConfig::default()
            },
            ApiConfig {
                timeout_secs: 0,
                ..ApiConfig::default()
            },
            ApiConfig {
                home_page_type: String::new(),
                ..ApiConfig::default()
            },
        ];

        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "Expected {config:?} to be rejected"
            );
        }
    }
}
