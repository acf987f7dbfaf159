//! Explorer Backend
//!
//! The engine API collaborator: [`GraphBackend`] for the three read
//! endpoints the explorer consumes, and [`HttpBackend`] speaking JSON
//! over HTTP.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod backend;
mod error;
mod http;

pub use backend::GraphBackend;
pub use error::BackendError;
pub use http::HttpBackend;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
