//! Hyper-based hosting server for slimrest endpoint pipelines.
//!
//! This crate provides the piece that turns declared namespaces into a
//! running HTTP service: a [`Router`] matching paths with `{name}`
//! template parameters, a [`Server`] that registries bind to, and the
//! reverse lookup that produces absolute endpoint URLs for pagination
//! links.

pub mod config;
pub mod router;
pub mod server;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use router::{RouteMatch, RouteResolution, Router};
pub use server::{Server, ServerError};
