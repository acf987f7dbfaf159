//! Explorer configuration

use crate::error::ConfigError;
use explorer_layout::{LayoutConfig, RoutingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Explorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Engine API root, e.g. `http://localhost:58236/api`
    pub api_root: String,
    /// Delay between sync ticks in milliseconds
    pub poll_interval_ms: u64,
    /// Per-request timeout; unset means requests may hang indefinitely
    pub request_timeout_ms: Option<u64>,
    /// Edge labels that anchor placement and get routed, in priority order
    pub edge_labels_of_interest: Vec<String>,
    /// Node labels whose elements carry an expandable settings panel
    pub configurable_node_labels: Vec<String>,
    /// Placement spacing
    pub layout: LayoutConfig,
    /// Curve and arrowhead dimensions
    pub routing: RoutingConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_root: "http://localhost:58236/api".to_string(),
            poll_interval_ms: 2000,
            request_timeout_ms: None,
            edge_labels_of_interest: vec!["SuggestedFor".to_string(), "BelongsTo".to_string()],
            configurable_node_labels: vec!["CrawlerSettings".to_string()],
            layout: LayoutConfig::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - `ConfigError::Invalid` if validation fails
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - otherwise as [`from_toml_str`](Self::from_toml_str)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// - `ConfigError::Invalid` naming the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_root.trim().is_empty() {
            return Err(ConfigError::Invalid("api_root is empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".to_string()));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("request_timeout_ms must be positive".to_string()));
        }
        if !self.layout.is_valid() {
            return Err(ConfigError::Invalid("layout spacing must be non-negative".to_string()));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// With API root
    #[inline]
    #[must_use]
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    /// With poll interval
    #[inline]
    #[must_use]
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    /// With edges of interest
    #[must_use]
    pub fn with_edge_labels_of_interest<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_labels_of_interest = labels.into_iter().map(Into::into).collect();
        self
    }

    /// With layout spacing
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ExplorerConfig::new();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.edge_labels_of_interest, vec!["SuggestedFor", "BelongsTo"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ExplorerConfig::from_toml_str(
            r#"
            poll_interval_ms = 500
            edge_labels_of_interest = ["RelatedTo"]

            [layout]
            horizontal_spacing = 120.0
            "#,
        )
        .unwrap();

        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.edge_labels_of_interest, vec!["RelatedTo"]);
        assert_eq!(config.layout.horizontal_spacing, 120.0);
        assert_eq!(config.layout.vertical_spacing, 40.0);
        assert_eq!(config.api_root, "http://localhost:58236/api");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ExplorerConfig::from_toml_str("poll_interval_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ExplorerConfig::from_toml_str("[layout]\nvertical_margin = -5.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ExplorerConfig::from_toml_str("poll_interval_ms = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_root = \"http://engine:9000/api\"").unwrap();
        writeln!(file, "request_timeout_ms = 1500").unwrap();

        let config = ExplorerConfig::from_path(file.path()).unwrap();
        assert_eq!(config.api_root, "http://engine:9000/api");
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1500)));

        let missing = ExplorerConfig::from_path("/nonexistent/explorer.toml");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
