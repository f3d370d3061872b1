//! Roster client configuration loaded via OrthoConfig.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{Reconciliation, RosterCacheConfig, UnknownReconciliation};

/// Service base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "https://dotnetbackend.onrender.com/api";

/// Per-request timeout used when none is configured.
///
/// Mirrors the `request_timeout_secs` default.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while interpreting configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API base URL did not parse or cannot carry a path.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidApiUrl {
        /// Raw configured value.
        url: String,
        /// Parser or shape failure.
        reason: String,
    },
    /// The API base URL uses a scheme other than http(s).
    #[error("API base URL '{url}' must use http or https")]
    UnsupportedScheme {
        /// Raw configured value.
        url: String,
    },
    /// The request timeout was configured as zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// The reconciliation strategy name is unknown.
    #[error(transparent)]
    Reconciliation(#[from] UnknownReconciliation),
}

/// Configuration values for the roster client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct RosterSettings {
    /// Base URL of the employee service.
    pub api_url: Option<String>,
    /// Delay between cold-start load attempts, in milliseconds.
    #[ortho_config(default = 2000)]
    pub retry_delay_ms: u64,
    /// Per-request timeout, in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Post-mutation reconciliation strategy: `merge` or `refetch`.
    pub reconciliation: Option<String>,
}

impl RosterSettings {
    /// Return the validated API base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured URL is unusable.
    pub fn api_base_url(&self) -> Result<ApiBaseUrl, ConfigError> {
        ApiBaseUrl::parse(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
    }

    /// Return the cold-start retry delay.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Return the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when configured as zero.
    pub const fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the reconciliation strategy, falling back to merge.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Reconciliation`] for an unknown name.
    pub fn reconciliation(&self) -> Result<Reconciliation, ConfigError> {
        match self.reconciliation.as_deref() {
            None => Ok(Reconciliation::default()),
            Some(raw) => Ok(raw.parse()?),
        }
    }

    /// Build the roster cache configuration from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the reconciliation strategy is unknown.
    pub fn cache_config(&self) -> Result<RosterCacheConfig, ConfigError> {
        Ok(RosterCacheConfig {
            retry_delay: self.retry_delay(),
            reconciliation: self.reconciliation()?,
        })
    }
}

/// Validated base URL of the employee service.
///
/// Surrounding whitespace and trailing slashes are stripped, so
/// `https://host/api/` and `https://host/api` address the same endpoints.
///
/// # Examples
/// ```
/// use roster::ApiBaseUrl;
///
/// let base = ApiBaseUrl::parse("https://example.test/api/").expect("valid URL");
/// assert_eq!(
///     base.endpoint(&["Employee", "7"]).as_str(),
///     "https://example.test/api/Employee/7"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBaseUrl(Url);

impl ApiBaseUrl {
    /// Parse and validate a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL does not parse, is not http(s), or
    /// cannot serve as a base for endpoint paths.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|error| ConfigError::InvalidApiUrl {
            url: raw.to_owned(),
            reason: error.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: raw.to_owned(),
            });
        }
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidApiUrl {
                url: raw.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }
        Ok(Self(url))
    }

    /// Underlying URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// Append path segments to the base URL.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
mod tests {
    //! Unit tests for roster configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use crate::domain::DEFAULT_RETRY_DELAY;

    const KEYS: [&str; 4] = [
        "ROSTER_API_URL",
        "ROSTER_RETRY_DELAY_MS",
        "ROSTER_REQUEST_TIMEOUT_SECS",
        "ROSTER_RECONCILIATION",
    ];

    fn load_from_empty_args() -> RosterSettings {
        RosterSettings::load_from_iter([OsString::from("roster")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.retry_delay_ms, 2000);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(
            settings.api_base_url().expect("default URL is valid").to_string(),
            DEFAULT_API_URL
        );
        assert_eq!(settings.retry_delay(), DEFAULT_RETRY_DELAY);
        assert_eq!(
            settings.request_timeout().expect("default timeout"),
            DEFAULT_REQUEST_TIMEOUT
        );
        assert_eq!(
            settings.cache_config().expect("default cache config"),
            RosterCacheConfig::default()
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ROSTER_API_URL", Some("http://localhost:5000/api/".to_owned())),
            ("ROSTER_RETRY_DELAY_MS", Some("250".to_owned())),
            ("ROSTER_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("ROSTER_RECONCILIATION", Some("refetch".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("valid URL").to_string(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            settings.cache_config().expect("valid cache config"),
            RosterCacheConfig {
                retry_delay: Duration::from_millis(250),
                reconciliation: Reconciliation::Refetch,
            }
        );
        assert_eq!(
            settings.request_timeout().expect("valid timeout"),
            Duration::from_secs(5)
        );
    }

    #[rstest]
    fn rejects_unknown_reconciliation() {
        let _guard = lock_env([
            ("ROSTER_API_URL", None::<String>),
            ("ROSTER_RETRY_DELAY_MS", None::<String>),
            ("ROSTER_REQUEST_TIMEOUT_SECS", Some("0".to_owned())),
            ("ROSTER_RECONCILIATION", Some("optimistic".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.cache_config(),
            Err(ConfigError::Reconciliation(_))
        ));
        assert_eq!(settings.request_timeout(), Err(ConfigError::ZeroTimeout));
    }

    #[rstest]
    #[case::no_slash("https://example.test/api", &["Employee"], "https://example.test/api/Employee")]
    #[case::trailing("https://example.test/api///", &["Employee", "add"], "https://example.test/api/Employee/add")]
    #[case::padded("  https://example.test/api/ ", &["Employee", "7"], "https://example.test/api/Employee/7")]
    #[case::root("http://localhost:5000/", &["Employee"], "http://localhost:5000/Employee")]
    fn builds_endpoints_without_double_slashes(
        #[case] base: &str,
        #[case] segments: &[&str],
        #[case] expected: &str,
    ) {
        let parsed = ApiBaseUrl::parse(base).expect("valid base");
        assert_eq!(parsed.endpoint(segments).as_str(), expected);
    }

    #[rstest]
    #[case::not_a_url("not a url")]
    #[case::mailto("mailto:hr@example.test")]
    #[case::ftp("ftp://example.test/api")]
    fn rejects_unusable_base_urls(#[case] raw: &str) {
        assert!(ApiBaseUrl::parse(raw).is_err());
    }
}
