//! Error types for the explorer core
//!
//! - Store errors wrap backend failures
//! - Config errors cover TOML loading and validation
//! - [`ExplorerError`] is what the public API returns

use explorer_backend::BackendError;
use explorer_graph::ProjectId;
use explorer_layout::LayoutError;
use std::path::PathBuf;

/// Main explorer error type
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// Fetch or merge failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Backend could not be constructed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Element operation rejected
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Project has never been synced or explored
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),
}

impl ExplorerError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            Self::Backend(e) => e.is_retryable(),
            Self::Layout(_) | Self::Config(_) | Self::UnknownProject(_) => false,
        }
    }
}

/// Graph store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Request did not produce a usable response
    #[error("fetch failed: {0}")]
    Backend(#[from] BackendError),

    /// Project has no graph in the registry
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),
}

impl StoreError {
    /// Check if the next tick may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_retryable(),
            Self::UnknownProject(_) => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML did not parse into a config
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Values out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
