//! Explorer Graph
//!
//! Per-project node/edge cache fed by incremental backend fetches.
//!
//! # Core Concepts
//!
//! - [`ProjectGraph`]: nodes, adjacency, reverse index, sibling groups and watermarks
//! - [`GraphRegistry`]: lazily created graphs keyed by [`ProjectId`]
//! - [`IdentityKey`]: order-sensitive rolling hash of a node id sequence
//! - [`EngineResponse`]: `{ type, data }` envelope of the engine API
//!
//! # Example
//!
//! ```rust,ignore
//! use explorer_graph::{GraphRegistry, ProjectId};
//!
//! let registry = GraphRegistry::new();
//! let graph = registry.ensure_project(&ProjectId::new("p1"));
//! graph.write().merge_nodes(nodes);
//! println!("watermark: {}", graph.read().nodes_watermark());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod edge;
mod identity;
mod node;
mod project;
mod registry;
mod wire;

// Re-exports
pub use edge::{Edge, NodeEdges};
pub use identity::{hash_ids, IdentityKey, RollingHasher};
pub use node::{Node, NodeFlag, NodeId, Payload};
pub use project::{MergeReport, ProjectGraph, ProjectId, RelatedNodes, SiblingGroup};
pub use registry::{FetchGuard, GraphRegistry, SharedGraph};
pub use wire::{EdgesBySource, EngineResponse, ExploreData};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
