//! # Client Configuration
//!
//! Settings for the `list` command and any embedding application.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. A TOML file (`--config PATH`, or `folio.toml` in the working directory
//!    if present)
//! 3. Environment: `FOLIO_URL`, `FOLIO_API_KEY`, `FOLIO_PAGE_SIZE`,
//!    `FOLIO_TIMEOUT_SECS`
//!
//! ```toml
//! url = "http://127.0.0.1:8080"
//! api_key = "secret"
//! page_size = 50
//! timeout_secs = 10
//! ```

use folio_core::{FolioError, PageRequest, SessionContext, primitives::DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Configuration file looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the collection server.
    pub url: String,
    /// Bearer key sent with every request.
    pub api_key: Option<String>,
    /// Page size used when the caller gives none.
    pub page_size: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Keys never reach logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Load defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist; the implicit `folio.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, FolioError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, FolioError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FolioError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text and validate the result.
    pub fn from_toml_str(text: &str) -> Result<Self, FolioError> {
        let config: Self =
            toml::from_str(text).map_err(|e| FolioError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()
    }

    /// Apply overrides from a variable lookup (the environment in production).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, FolioError> {
        if let Some(url) = lookup("FOLIO_URL") {
            self.url = url;
        }
        if let Some(key) = lookup("FOLIO_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(size) = lookup("FOLIO_PAGE_SIZE") {
            self.page_size = size.parse().map_err(|_| {
                FolioError::Config(format!("FOLIO_PAGE_SIZE '{}' is not a number", size))
            })?;
        }
        if let Some(secs) = lookup("FOLIO_TIMEOUT_SECS") {
            self.timeout_secs = secs.parse().map_err(|_| {
                FolioError::Config(format!("FOLIO_TIMEOUT_SECS '{}' is not a number", secs))
            })?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, FolioError> {
        if self.url.trim().is_empty() {
            return Err(FolioError::Config("url must not be empty".to_string()));
        }
        PageRequest::first(self.page_size)
            .map_err(|e| FolioError::Config(format!("page_size: {}", e)))?;
        if self.timeout_secs == 0 {
            return Err(FolioError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Session context carrying the configured key.
    pub fn session(&self) -> SessionContext {
        match &self.api_key {
            Some(key) => SessionContext::authenticated(key.clone()),
            None => SessionContext::anonymous(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.clone().validate().is_ok());
        assert_eq!(config.session(), SessionContext::anonymous());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str("page_size = 50").expect("parse");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.url, ClientConfig::default().url);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = ClientConfig::from_toml_str("colour = \"blue\"");
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        assert!(ClientConfig::from_toml_str("page_size = 0").is_err());
        assert!(ClientConfig::from_toml_str("page_size = 5000").is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let config = ClientConfig::from_toml_str("url = \"http://file:1\"\npage_size = 5")
            .expect("parse")
            .with_overrides(lookup(&[
                ("FOLIO_URL", "http://env:2"),
                ("FOLIO_API_KEY", "k"),
            ]))
            .expect("overrides");

        assert_eq!(config.url, "http://env:2");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.session().token(), Some("k"));
    }

    #[test]
    fn non_numeric_override_is_rejected() {
        let result =
            ClientConfig::default().with_overrides(lookup(&[("FOLIO_PAGE_SIZE", "lots")]));
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "url = \"http://example:9\"\ntimeout_secs = 3").expect("write");

        let config = ClientConfig::from_file(file.path()).expect("load");
        assert_eq!(config.url, "http://example:9");
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = ClientConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig {
            api_key: Some("hunter2".to_string()),
            ..ClientConfig::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
