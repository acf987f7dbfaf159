//! Explorer Layout
//!
//! Turns a [`ProjectGraph`](explorer_graph::ProjectGraph) into display-stable
//! elements, places them on the canvas and routes the edges between them.
//!
//! # Core Concepts
//!
//! - [`WorkflowElement`]: one ungrouped node or one sibling cluster, keyed by
//!   the [`IdentityKey`](explorer_graph::IdentityKey) of its node sequence
//! - [`reconcile`]: minimal add/remove plan against the live [`ElementSet`]
//! - [`Placer`]: one-time placement next to an anchor or in the viewport
//! - [`PathRouter`]: quadratic curves, arrowheads and label anchors

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod element;
mod error;
mod geometry;
mod placer;
mod reconcile;
mod router;

pub use element::{ApplyReport, CanvasState, ElementKind, ElementSet, LayoutState, WorkflowElement};
pub use error::LayoutError;
pub use geometry::{CanvasPosition, Point};
pub use placer::{LayoutConfig, Placer};
pub use reconcile::{reconcile, reconcile_into, ReconcilePlan};
pub use router::{EdgePath, PathRouter, RoutedEdge, RoutingConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
