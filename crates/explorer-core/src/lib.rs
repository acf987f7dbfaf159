//! Explorer Core
//!
//! Keeps a project's graph in sync with the engine and turns it into
//! placed, routed elements for the UI:
//! - Incremental node/edge fetches merged behind watermarks
//! - Fixed-interval polling with single-flight ticks per project
//! - Reconciliation into display-stable elements after every merge
//! - One-time placement and edge routing on demand
//!
//! # Example
//!
//! ```rust,ignore
//! use explorer_core::{Explorer, ExplorerConfig, ProjectId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let explorer = Explorer::new(ExplorerConfig::from_path("explorer.toml")?)?;
//! let project = ProjectId::new("p-1");
//!
//! explorer.explore(&project).await?;
//! explorer.start_sync(&project);
//!
//! for key in explorer.workflow_order(&project) {
//!     explorer.place_element(&project, key, 320.0, 180.0)?;
//! }
//! println!("{} edges", explorer.routed_edges(&project).len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod explorer;
pub mod scheduler;
pub mod store;
pub mod views;

pub use config::ExplorerConfig;
pub use error::{ConfigError, ExplorerError, StoreError};
pub use explorer::Explorer;
pub use scheduler::{SyncScheduler, TickOutcome};
pub use store::GraphStore;
pub use views::{SharedView, ViewRegistry};

pub use explorer_graph::{IdentityKey, NodeId, ProjectId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding the explorer
    pub use crate::{Explorer, ExplorerConfig, ExplorerError, TickOutcome};
    pub use explorer_graph::{IdentityKey, Node, NodeId, ProjectGraph, ProjectId};
    pub use explorer_layout::{CanvasPosition, LayoutState, RoutedEdge, WorkflowElement};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
