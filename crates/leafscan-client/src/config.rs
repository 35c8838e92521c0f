//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::{ClientResult, PredictionError};

/// Port the classification service listens on in every profile.
pub const DEFAULT_PORT: u16 = 8000;

/// Where the classification service is reachable from, per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrlProfile {
    /// Same host (web dev server, desktop)
    Local,
    /// Android emulator, which reaches the host through `10.0.2.2`
    AndroidEmulator,
    /// iOS simulator, which shares the host loopback
    IosSimulator,
    /// Physical device on the same network as the service host
    Lan(String),
}

impl BaseUrlProfile {
    /// Resolve the profile to a base URL.
    pub fn base_url(&self) -> String {
        match self {
            BaseUrlProfile::Local | BaseUrlProfile::IosSimulator => {
                format!("http://localhost:{}", DEFAULT_PORT)
            }
            BaseUrlProfile::AndroidEmulator => format!("http://10.0.2.2:{}", DEFAULT_PORT),
            BaseUrlProfile::Lan(host) => format!("http://{}:{}", host, DEFAULT_PORT),
        }
    }
}

impl fmt::Display for BaseUrlProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseUrlProfile::Local => write!(f, "local"),
            BaseUrlProfile::AndroidEmulator => write!(f, "android-emulator"),
            BaseUrlProfile::IosSimulator => write!(f, "ios-simulator"),
            BaseUrlProfile::Lan(host) => write!(f, "lan:{}", host),
        }
    }
}

impl FromStr for BaseUrlProfile {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(host) = s.strip_prefix("lan:") {
            let host = host.trim();
            if host.is_empty() {
                return Err(PredictionError::invalid_config("lan profile requires a host"));
            }
            return Ok(BaseUrlProfile::Lan(host.to_string()));
        }

        match s.to_lowercase().as_str() {
            "local" | "localhost" | "web" => Ok(BaseUrlProfile::Local),
            "android-emulator" | "android" => Ok(BaseUrlProfile::AndroidEmulator),
            "ios-simulator" | "ios" => Ok(BaseUrlProfile::IosSimulator),
            _ => Err(PredictionError::invalid_config(format!(
                "Unknown base URL profile: {}",
                s
            ))),
        }
    }
}

/// Configuration for the prediction client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the classification service
    pub base_url: String,
    /// Timeout for `POST /predict`
    pub predict_timeout: Duration,
    /// Timeout for `GET /ping`
    pub ping_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrlProfile::Local.base_url(),
            predict_timeout: Duration::from_secs(30),
            ping_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// `LEAFSCAN_API_URL` takes precedence over `LEAFSCAN_API_PROFILE`.
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let base_url = var("LEAFSCAN_API_URL")
            .or_else(|| {
                var("LEAFSCAN_API_PROFILE").and_then(|raw| match raw.parse::<BaseUrlProfile>() {
                    Ok(profile) => Some(profile.base_url()),
                    Err(e) => {
                        warn!("Ignoring LEAFSCAN_API_PROFILE: {}", e);
                        None
                    }
                })
            })
            .unwrap_or(defaults.base_url);

        let secs = |key: &str, default: Duration| match var(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => {
                    warn!(
                        "Ignoring {}={:?} ({}), using {}s",
                        key,
                        raw,
                        e,
                        default.as_secs()
                    );
                    default
                }
            },
        };

        Self {
            base_url,
            predict_timeout: secs("LEAFSCAN_PREDICT_TIMEOUT_SECS", defaults.predict_timeout),
            ping_timeout: secs("LEAFSCAN_PING_TIMEOUT_SECS", defaults.ping_timeout),
        }
    }

    /// Config for a named deployment profile with default timeouts.
    pub fn for_profile(profile: &BaseUrlProfile) -> Self {
        Self::default().with_base_url(profile.base_url())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_predict_timeout(mut self, timeout: Duration) -> Self {
        self.predict_timeout = timeout;
        self
    }

    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    /// Check the base URL and timeouts, returning a normalized copy.
    pub fn validate(&self) -> ClientResult<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|e| {
            PredictionError::invalid_config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PredictionError::invalid_config(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(PredictionError::invalid_config(format!(
                "Base URL has no host: {}",
                self.base_url
            )));
        }
        if self.predict_timeout.is_zero() || self.ping_timeout.is_zero() {
            return Err(PredictionError::invalid_config("Timeouts must be non-zero"));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            ..self.clone()
        })
    }

    /// Full URL for an endpoint path such as `/predict`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.predict_timeout, Duration::from_secs(30));
        assert_eq!(config.ping_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_profiles() {
        assert_eq!(
            BaseUrlProfile::AndroidEmulator.base_url(),
            "http://10.0.2.2:8000"
        );
        assert_eq!(BaseUrlProfile::IosSimulator.base_url(), "http://localhost:8000");
        assert_eq!(
            "lan:192.168.1.28".parse::<BaseUrlProfile>().unwrap().base_url(),
            "http://192.168.1.28:8000"
        );
        assert_eq!(
            "android".parse::<BaseUrlProfile>().unwrap(),
            BaseUrlProfile::AndroidEmulator
        );
        assert!("lan:".parse::<BaseUrlProfile>().is_err());
        assert!("mars".parse::<BaseUrlProfile>().is_err());
    }

    #[test]
    fn test_profile_display_parses_back() {
        for profile in [
            BaseUrlProfile::Local,
            BaseUrlProfile::AndroidEmulator,
            BaseUrlProfile::IosSimulator,
            BaseUrlProfile::Lan("10.1.1.5".to_string()),
        ] {
            assert_eq!(profile.to_string().parse::<BaseUrlProfile>().unwrap(), profile);
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("LEAFSCAN_API_PROFILE", "android-emulator"),
            ("LEAFSCAN_PREDICT_TIMEOUT_SECS", "12"),
            ("LEAFSCAN_PING_TIMEOUT_SECS", " 2 "),
        ]));
        assert_eq!(config.base_url, "http://10.0.2.2:8000");
        assert_eq!(config.predict_timeout, Duration::from_secs(12));
        assert_eq!(config.ping_timeout, Duration::from_secs(2));

        let config = ClientConfig::from_lookup(lookup(&[
            ("LEAFSCAN_API_URL", "http://192.168.1.28:8000"),
            ("LEAFSCAN_API_PROFILE", "ios-simulator"),
        ]));
        assert_eq!(config.base_url, "http://192.168.1.28:8000");
    }

    #[test]
    fn test_from_lookup_falls_back_on_bad_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("LEAFSCAN_API_PROFILE", "mars"),
            ("LEAFSCAN_PREDICT_TIMEOUT_SECS", "thirty"),
            ("LEAFSCAN_PING_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_validate_trims_trailing_slash() {
        let config = ClientConfig::default()
            .with_base_url("http://example.com:8000/")
            .validate()
            .unwrap();
        assert_eq!(config.base_url, "http://example.com:8000");
        assert_eq!(config.endpoint("/predict"), "http://example.com:8000/predict");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(ClientConfig::default().with_base_url("not a url").validate().is_err());
        assert!(ClientConfig::default()
            .with_base_url("ftp://example.com")
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_predict_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
