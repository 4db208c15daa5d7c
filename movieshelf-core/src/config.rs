//! Centralized configuration for Movieshelf.
//!
//! All tunable parameters are defined here so the loader and the session
//! controller never carry their own hard-coded values.

use std::time::Duration;

use url::Url;

use crate::MovieshelfError;

/// Public paginated movie endpoint used when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://jsonfakery.com/movies/paginated";

/// Environment variable overriding the remote catalog base URL.
pub const CATALOG_URL_ENV: &str = "MOVIESHELF_CATALOG_URL";

/// Central configuration for all Movieshelf components.
#[derive(Debug, Clone, Default)]
pub struct MovieshelfConfig {
    pub remote: RemoteConfig,
    pub paging: PagingConfig,
    pub search: SearchConfig,
}

/// Remote paging endpoint configuration.
///
/// Controls where pages are requested from and how long a single page
/// request may take before it counts as a failed page.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the paginated endpoint; `?page=<n>` is appended per request
    pub base_url: String,
    /// Timeout for a single page request
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: "movieshelf/0.1.0",
        }
    }
}

/// Paging limits shared by the loader and the session controller.
#[derive(Debug, Clone)]
pub struct PagingConfig {
    /// Maximum number of remote pages fetched per session
    pub page_ceiling: u32,
    /// Number of records exposed per display window
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_ceiling: 5,
            page_size: 20,
        }
    }
}

/// Search input handling.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period a query must survive before it is applied
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
        }
    }
}

impl MovieshelfConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Only the remote base URL can be overridden. A value that does not
    /// parse as a URL is ignored and the default stays in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(CATALOG_URL_ENV) {
            match Url::parse(&raw) {
                Ok(url) => config.remote.base_url = url.to_string(),
                Err(e) => tracing::warn!(
                    "Ignoring {CATALOG_URL_ENV}={raw}: {e}, using {}",
                    config.remote.base_url
                ),
            }
        }

        config
    }

    /// Creates a configuration pointed at a test endpoint with a short timeout.
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            remote: RemoteConfig {
                base_url: base_url.into(),
                request_timeout: Duration::from_secs(2),
                ..Default::default()
            },
            search: SearchConfig {
                debounce: Duration::from_millis(10),
            },
            ..Default::default()
        }
    }

    /// Checks the configuration for values the loader cannot work with.
    ///
    /// # Errors
    ///
    /// - `MovieshelfError::Configuration` - Base URL does not parse, or page size or page ceiling is zero
    pub fn validate(&self) -> Result<(), MovieshelfError> {
        Url::parse(&self.remote.base_url).map_err(|e| MovieshelfError::Configuration {
            reason: format!("invalid base URL '{}': {e}", self.remote.base_url),
        })?;

        if self.paging.page_size == 0 {
            return Err(MovieshelfError::Configuration {
                reason: "page size must be at least 1".to_string(),
            });
        }

        if self.paging.page_ceiling == 0 {
            return Err(MovieshelfError::Configuration {
                reason: "page ceiling must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = MovieshelfConfig::default();

        assert_eq!(config.remote.base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.remote.request_timeout, Duration::from_secs(10));
        assert_eq!(config.paging.page_ceiling, 5);
        assert_eq!(config.paging.page_size, 20);
        assert_eq!(config.search.debounce, Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_preset() {
        let config = MovieshelfConfig::for_testing("http://127.0.0.1:9999/movies");

        assert_eq!(config.remote.base_url, "http://127.0.0.1:9999/movies");
        assert_eq!(config.remote.request_timeout, Duration::from_secs(2));
        assert_eq!(config.paging.page_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MovieshelfConfig::for_testing("not a url");
        assert!(matches!(
            config.validate(),
            Err(MovieshelfError::Configuration { .. })
        ));

        config.remote.base_url = DEFAULT_CATALOG_URL.to_string();
        config.paging.page_size = 0;
        assert!(config.validate().is_err());

        config.paging.page_size = 20;
        config.paging.page_ceiling = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var(CATALOG_URL_ENV, "http://localhost:8080/movies/paginated");
        }

        let config = MovieshelfConfig::from_env();
        assert_eq!(
            config.remote.base_url,
            "http://localhost:8080/movies/paginated"
        );

        unsafe {
            std::env::set_var(CATALOG_URL_ENV, "::not-a-url::");
        }

        let config = MovieshelfConfig::from_env();
        assert_eq!(config.remote.base_url, DEFAULT_CATALOG_URL);

        // Cleanup
        unsafe {
            std::env::remove_var(CATALOG_URL_ENV);
        }
    }
}
