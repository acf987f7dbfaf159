//! Layout error types

use explorer_graph::IdentityKey;

/// Errors from element layout operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// No live element has this identity
    #[error("unknown element: {0}")]
    UnknownElement(IdentityKey),

    /// Expand/collapse requested on a kind that has no settings panel
    #[error("element {0} is not configurable")]
    NotConfigurable(IdentityKey),

    /// Element exists but has no position yet
    #[error("element {0} has not been placed")]
    NotPlaced(IdentityKey),

    /// Requested size is negative or not finite
    #[error("invalid element size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}
