//! # Remote Configuration
//!
//! Endpoints and timeouts for the booking store and payment API.
//! All values are loaded from environment variables.

use booking_core::ConfigError;
use reqwest::Url;
use std::env;
use std::time::Duration;

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAYMENT_TIMEOUT_SECS: u64 = 15;

/// Booking store and payment API configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the booking store (`POST {url}/booking`)
    pub booking_store_url: Url,

    /// Base URL of the payment API (`POST {url}/create-checkout-session`)
    pub payment_api_url: Url,

    /// Bound on each booking store call
    pub store_timeout: Duration,

    /// Bound on each payment API call
    pub payment_timeout: Duration,

    /// Hosted checkout page; when set, redirects carry
    /// `{url}?session_id=...` in addition to the session id
    pub checkout_redirect_url: Option<Url>,
}

impl RemoteConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `BOOKING_STORE_URL`
    /// - `PAYMENT_API_URL`
    ///
    /// Optional:
    /// - `BOOKING_STORE_TIMEOUT_SECS` (default 10)
    /// - `PAYMENT_TIMEOUT_SECS` (default 15)
    /// - `CHECKOUT_REDIRECT_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing(format!("{} not set", key)))
        };

        let booking_store_url = parse_url("BOOKING_STORE_URL", &required("BOOKING_STORE_URL")?)?;
        let payment_api_url = parse_url("PAYMENT_API_URL", &required("PAYMENT_API_URL")?)?;

        let store_timeout = parse_secs(
            "BOOKING_STORE_TIMEOUT_SECS",
            lookup("BOOKING_STORE_TIMEOUT_SECS"),
            DEFAULT_STORE_TIMEOUT_SECS,
        )?;
        let payment_timeout = parse_secs(
            "PAYMENT_TIMEOUT_SECS",
            lookup("PAYMENT_TIMEOUT_SECS"),
            DEFAULT_PAYMENT_TIMEOUT_SECS,
        )?;

        let checkout_redirect_url = lookup("CHECKOUT_REDIRECT_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_url("CHECKOUT_REDIRECT_URL", &v))
            .transpose()?;

        Ok(Self {
            booking_store_url,
            payment_api_url,
            store_timeout,
            payment_timeout,
            checkout_redirect_url,
        })
    }

    /// Create config with explicit URLs and default timeouts (for testing)
    pub fn new(booking_store_url: &str, payment_api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            booking_store_url: parse_url("booking store URL", booking_store_url)?,
            payment_api_url: parse_url("payment API URL", payment_api_url)?,
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            payment_timeout: Duration::from_secs(DEFAULT_PAYMENT_TIMEOUT_SECS),
            checkout_redirect_url: None,
        })
    }

    /// Builder: set both call timeouts
    pub fn with_timeouts(mut self, store: Duration, payment: Duration) -> Self {
        self.store_timeout = store;
        self.payment_timeout = payment;
        self
    }

    /// Builder: set the hosted checkout redirect URL
    pub fn with_checkout_redirect_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.checkout_redirect_url = Some(parse_url("checkout redirect URL", url)?);
        Ok(self)
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    let value = value.trim();
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "{} must start with http:// or https://",
            name
        )));
    }

    let url = Url::parse(value.trim_end_matches('/'))
        .map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid(format!("{} cannot be a base URL", name)));
    }

    Ok(url)
}

fn parse_secs(name: &str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::Invalid(format!(
                "{} must be a positive number of seconds",
                name
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = RemoteConfig::from_lookup(lookup(&[
            ("BOOKING_STORE_URL", "http://localhost:4000/api/v1/"),
            ("PAYMENT_API_URL", "https://pay.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.booking_store_url.as_str(), "http://localhost:4000/api/v1");
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.payment_timeout, Duration::from_secs(15));
        assert!(config.checkout_redirect_url.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = RemoteConfig::from_lookup(lookup(&[
            ("BOOKING_STORE_URL", "http://localhost:4000"),
            ("PAYMENT_API_URL", "http://localhost:4000"),
            ("BOOKING_STORE_TIMEOUT_SECS", "3"),
            ("PAYMENT_TIMEOUT_SECS", "7"),
            ("CHECKOUT_REDIRECT_URL", "https://checkout.example.com/pay"),
        ]))
        .unwrap();

        assert_eq!(config.store_timeout, Duration::from_secs(3));
        assert_eq!(config.payment_timeout, Duration::from_secs(7));
        assert_eq!(
            config.checkout_redirect_url.unwrap().as_str(),
            "https://checkout.example.com/pay"
        );
    }

    #[test]
    fn test_missing_store_url() {
        let err =
            RemoteConfig::from_lookup(lookup(&[("PAYMENT_API_URL", "http://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref m) if m.contains("BOOKING_STORE_URL")));
    }

    #[test]
    fn test_invalid_values() {
        let err = RemoteConfig::from_lookup(lookup(&[
            ("BOOKING_STORE_URL", "localhost:4000"),
            ("PAYMENT_API_URL", "http://x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RemoteConfig::from_lookup(lookup(&[
            ("BOOKING_STORE_URL", "http://x"),
            ("PAYMENT_API_URL", "http://x"),
            ("PAYMENT_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("PAYMENT_TIMEOUT_SECS")));
    }
}
