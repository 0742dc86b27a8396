//! Client configuration.

use crate::Error;
use std::env;
use std::time::Duration;

/// Groq's OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Timeout used by [`ClientConfig::from_env`] when none is set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`ChatClient`](crate::ChatClient).
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Whole-request timeout, covering connect and the full streamed read.
    pub timeout: Duration,
    /// Proxy applied to every scheme.
    pub proxy_url: Option<String>,
    /// Disables TLS certificate validation. Development use only.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a configuration with an explicit timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout,
            proxy_url: None,
            accept_invalid_certs: false,
        }
    }

    /// Route requests through a proxy.
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Turn off certificate validation.
    ///
    /// Any certificate, including expired or self-signed ones, will be
    /// trusted. Only meant for local setups behind intercepting proxies.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// * `API_KEY` - bearer credential (required)
    /// * `CHAT_COMPLETIONS_URL` - endpoint, defaults to [`DEFAULT_ENDPOINT`]
    /// * `PROXY_URL` - optional proxy
    /// * `REQUEST_TIMEOUT_SECS` - defaults to 60
    /// * `DANGER_ACCEPT_INVALID_CERTS` - `true` or `1` to disable validation
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source, such as a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .ok_or_else(|| Error::config("API_KEY environment variable is required"))?;
        let endpoint =
            lookup("CHAT_COMPLETIONS_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    Error::config(format!("REQUEST_TIMEOUT_SECS is not a number: {secs}"))
                })?,
            None => DEFAULT_TIMEOUT,
        };

        let mut config = Self::new(endpoint, api_key, timeout);
        if let Some(proxy) = lookup("PROXY_URL") {
            if !proxy.trim().is_empty() {
                config = config.with_proxy(proxy);
            }
        }
        if let Some(flag) = lookup("DANGER_ACCEPT_INVALID_CERTS") {
            config = config.danger_accept_invalid_certs(parse_flag(&flag));
        }

        Ok(config)
    }

    /// Check the settings that must be present before any request is made.
    pub fn validate(&self) -> Result<(), Error> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::config("endpoint URL is empty"));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::config("API key is empty"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

// The key is never printed.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("proxy_url", &self.proxy_url)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_defaults_secure() {
        let config = ClientConfig::new(DEFAULT_ENDPOINT, "key", Duration::from_secs(5));
        assert!(config.validate().is_ok());
        assert!(!config.accept_invalid_certs);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_missing_credential() {
        let config = ClientConfig::new(DEFAULT_ENDPOINT, "", Duration::from_secs(5));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_endpoint() {
        let config = ClientConfig::new(" ", "key", Duration::from_secs(5));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClientConfig::new(DEFAULT_ENDPOINT, "key", Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new(DEFAULT_ENDPOINT, "sk-secret", Duration::from_secs(5));
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_lookup_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[("API_KEY", "gsk-test")])).unwrap();
        assert_eq!(config.api_key, "gsk-test");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.proxy_url.is_none());
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_lookup_missing_key() {
        let result = ClientConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_lookup_overrides() {
        let vars = [
            ("API_KEY", "gsk-test"),
            ("CHAT_COMPLETIONS_URL", "http://localhost:8080/v1/chat/completions"),
            ("REQUEST_TIMEOUT_SECS", " 15 "),
            ("PROXY_URL", "http://proxy.local:3128"),
            ("DANGER_ACCEPT_INVALID_CERTS", "1"),
        ];
        let config = ClientConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy.local:3128"));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_lookup_bad_timeout() {
        let vars = [("API_KEY", "gsk-test"), ("REQUEST_TIMEOUT_SECS", "soon")];
        let result = ClientConfig::from_lookup(lookup_from(&vars));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_lookup_blank_proxy_ignored() {
        let vars = [("API_KEY", "gsk-test"), ("PROXY_URL", "   ")];
        let config = ClientConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
