//! Configuration module
//!
//! Handles CLI configuration: log store URL, credentials and transport settings.

use std::time::Duration;

use logcache_client::TransportConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the log store
    pub url: String,

    /// Access token sent with every request
    pub token: String,

    /// Maximum number of envelopes rendered per command
    pub max_lines: usize,

    /// HTTP transport settings
    pub transport: TransportConfig,
}

impl Config {
    /// Creates a new configuration with default transport settings
    pub fn new(url: String, token: String) -> Self {
        Self {
            url,
            token,
            max_lines: 100,
            transport: TransportConfig::default(),
        }
    }

    /// Skips server certificate validation
    pub fn with_skip_ssl_validation(mut self, skip: bool) -> Self {
        self.transport.skip_ssl_validation = skip;
        self
    }

    /// Sets a whole-request timeout in seconds
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.transport.timeout = secs.map(Duration::from_secs);
        self
    }

    /// Routes requests through `proxy`
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.transport.proxy = proxy;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.url.is_empty() {
            anyhow::bail!("url cannot be empty");
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!("url must start with http:// or https://");
        }

        if self.max_lines == 0 {
            anyhow::bail!("max_lines must be greater than 0");
        }

        if self.transport.timeout == Some(Duration::ZERO) {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(
            "https://log-cache.example.com".to_string(),
            "token".to_string(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = config();
        assert_eq!(config.max_lines, 100);
        assert!(!config.transport.skip_ssl_validation);
        assert_eq!(config.transport.timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();

        config.url = String::new();
        assert!(config.validate().is_err());

        config.url = "log-cache.example.com".to_string();
        assert!(config.validate().is_err());

        config.url = "http://localhost:8080".to_string();
        assert!(config.validate().is_ok());

        config.max_lines = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = config()
            .with_skip_ssl_validation(true)
            .with_timeout_secs(Some(15))
            .with_proxy(Some("http://proxy:3128".to_string()))
            .with_max_lines(7);

        assert!(config.transport.skip_ssl_validation);
        assert_eq!(config.transport.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.transport.proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.max_lines, 7);
        assert!(config.validate().is_ok());

        assert!(config.with_timeout_secs(Some(0)).validate().is_err());
    }
}
