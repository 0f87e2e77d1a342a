//! Dashboard configuration
//!
//! Built once at startup and handed to the assembler; nothing downstream
//! reads the environment.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Immutable dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Media server URL, shown on the overview page
    pub server_url: String,
    /// Whether the SIP service is deployed; when off no SIP call is made
    pub sip_enabled: bool,
    /// Deadline for each listing call
    pub fetch_timeout_ms: u64,
    /// Whether to list participants of every room for connection analytics
    pub connection_analytics: bool,
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With server URL
    #[inline]
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// With SIP enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_sip(mut self, enabled: bool) -> Self {
        self.sip_enabled = enabled;
        self
    }

    /// With per-call deadline
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With connection analytics enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_connection_analytics(mut self, enabled: bool) -> Self {
        self.connection_analytics = enabled;
        self
    }

    /// Per-call deadline
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML, `ConfigError::InvalidValue`
    /// when validation fails.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Overlay values from the process environment
    ///
    /// Recognised: `LIVEKIT_URL`, `ENABLE_SIP`, `DASH_FETCH_TIMEOUT_MS`,
    /// `DASH_CONNECTION_ANALYTICS`.
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` on unparsable values.
    pub fn overlay_env(self) -> Result<Self, ConfigError> {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` on unparsable values.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LIVEKIT_URL") {
            self.server_url = url;
        }
        if let Some(flag) = lookup("ENABLE_SIP") {
            self.sip_enabled = parse_flag(&flag);
        }
        if let Some(flag) = lookup("DASH_CONNECTION_ANALYTICS") {
            self.connection_analytics = parse_flag(&flag);
        }
        if let Some(ms) = lookup("DASH_FETCH_TIMEOUT_MS") {
            self.fetch_timeout_ms = ms
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("fetch_timeout_ms", format!("{ms:?}: {e}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::invalid("server_url", "must not be empty"));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::invalid("fetch_timeout_ms", "must be positive"));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:7880".to_string(),
            sip_enabled: false,
            fetch_timeout_ms: 5_000,
            connection_analytics: true,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert!(!config.sip_enabled);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder() {
        let config = DashboardConfig::new()
            .with_server_url("wss://media.example.com")
            .with_sip(true)
            .with_fetch_timeout(Duration::from_millis(750));

        assert_eq!(config.server_url, "wss://media.example.com");
        assert!(config.sip_enabled);
        assert_eq!(config.fetch_timeout_ms, 750);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml_str("sip_enabled = true\n").unwrap();
        assert!(config.sip_enabled);
        assert_eq!(config.fetch_timeout_ms, 5_000);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = DashboardConfig::from_toml_str("fetch_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "fetch_timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = DashboardConfig::from_toml_str("sip_enabled = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = \"wss://lk.internal\"").unwrap();
        writeln!(file, "fetch_timeout_ms = 1500").unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server_url, "wss://lk.internal");
        assert_eq!(config.fetch_timeout_ms, 1500);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DashboardConfig::from_file("/nonexistent/dash.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn env_overlay() {
        let config = DashboardConfig::default()
            .overlay(env(&[
                ("LIVEKIT_URL", "wss://prod"),
                ("ENABLE_SIP", "TRUE"),
                ("DASH_FETCH_TIMEOUT_MS", "250"),
            ]))
            .unwrap();

        assert_eq!(config.server_url, "wss://prod");
        assert!(config.sip_enabled);
        assert_eq!(config.fetch_timeout_ms, 250);
    }

    #[test]
    fn env_overlay_rejects_bad_timeout() {
        let err = DashboardConfig::default()
            .overlay(env(&[("DASH_FETCH_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn sip_flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" Yes "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
