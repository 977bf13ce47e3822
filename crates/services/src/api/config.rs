use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "CONCEPTLY_API_URL";
pub const API_TIMEOUT_VAR: &str = "CONCEPTLY_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how long a request may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidUrl {
            value: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `CONCEPTLY_API_URL` and `CONCEPTLY_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let base = lookup(API_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&base)?;
        if let Some(raw) = lookup(API_TIMEOUT_VAR).filter(|value| !value.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Absolute URL for an API path such as `sessions/4/checkpoints`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = ApiConfig::from_lookup(|key| match key {
            API_URL_VAR => Some("https://tutor.example.com/api/".into()),
            API_TIMEOUT_VAR => Some("5".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.endpoint("/sessions/"),
            "https://tutor.example.com/api/sessions/"
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            ApiConfig::from_lookup(|key| (key == API_URL_VAR).then(|| "not a url".into())),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::from_lookup(|key| (key == API_TIMEOUT_VAR).then(|| "soon".into())),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ApiConfig::new("http://localhost:8000").unwrap();
        assert_eq!(
            config.endpoint("sessions/4/checkpoints"),
            "http://localhost:8000/sessions/4/checkpoints"
        );
    }
}
