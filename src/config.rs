use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_EXPORT_PATH, DEFAULT_TIMEOUT_SECS, RSS_FEED_URL,
};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Resolved configuration with all values filled in.
///
/// This struct represents the application defaults and can be deserialized by the TOML
/// loader. Missing keys fall back to the defaults, unknown keys are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// RSS feed announcing the current sanctions export
    pub feed_url: String,
    /// Direct URL of the XML export. When set, the RSS feed is not consulted.
    pub document_url: Option<String>,
    /// Timeout applied to every HTTP request, in seconds
    pub request_timeout_secs: u64,
    /// How long a loaded snapshot is reused before the next command refetches it
    pub cache_ttl_secs: u64,
    /// Default destination of the `export` command
    pub export_path: PathBuf,
    /// Filters applied when the command line does not provide its own
    pub filters: FilterDefaults,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            feed_url: RSS_FEED_URL.to_string(),
            document_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            filters: FilterDefaults::default(),
        }
    }
}

/// Default filter selection, stored under `[filters]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterDefaults {
    /// Countries to keep; empty keeps all countries
    pub countries: Vec<String>,
    /// `"person"`, `"entity"` or `"all"`
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// Name substring (active from 3 characters)
    pub name: Option<String>,
}

impl ResolvedConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` when the file cannot be read, `InvalidInput` if the TOML is
    /// malformed, unknown keys are present or the timeout is zero, and `UrlError`
    /// when a configured URL cannot be parsed.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: ResolvedConfig = toml::from_str(contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Request timeout must be greater than 0".into(),
            ));
        }
        Url::parse(&self.feed_url)?;
        if let Some(ref document_url) = self.document_url {
            Url::parse(document_url)?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
