//! Store configuration.
//!
//! Defaults match the publishing layout: markdown files under
//! `content/case-studies`, cached for five minutes. Each value can be
//! overridden from the environment.

use crate::collection::DEFAULT_EXTENSION;
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default content directory, relative to the working directory.
pub const DEFAULT_CONTENT_DIR: &str = "content/case-studies";

/// Default freshness window (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Environment variable overriding the content directory.
pub const ENV_CONTENT_DIR: &str = "CASEBOOK_CONTENT_DIR";

/// Environment variable overriding the document extension.
pub const ENV_EXTENSION: &str = "CASEBOOK_EXTENSION";

/// Environment variable overriding the freshness window, in seconds.
pub const ENV_CACHE_TTL_SECS: &str = "CASEBOOK_CACHE_TTL_SECS";

/// Configuration for a directory-backed document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the documents.
    pub content_dir: PathBuf,
    /// Document file extension, without the dot.
    pub extension: String,
    /// How long a loaded snapshot or entry stays fresh.
    pub cache_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl StoreConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content directory.
    #[must_use]
    pub fn content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    /// Sets the document extension.
    #[must_use]
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Sets the freshness window.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`, starting from the defaults.
    ///
    /// Unset or blank variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_CONTENT_DIR) {
            config.content_dir = PathBuf::from(dir);
        }

        if let Some(ext) = get(ENV_EXTENSION) {
            config = config.extension(ext.trim());
            if config.extension.is_empty() {
                return Err(Error::Config {
                    message: format!("{ENV_EXTENSION} must not be just a dot"),
                });
            }
        }

        if let Some(secs) = get(ENV_CACHE_TTL_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|e| Error::Config {
                message: format!("{ENV_CACHE_TTL_SECS}={secs}: {e}"),
            })?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
